use async_trait::async_trait;
use crate::error::BackendError;
use super::{
    session::{
        Session,
        SessionToken,
    },
    user::User,
};

#[async_trait]
pub trait UserBackend {
    /// Insert the user along with its initial password only if no user
    /// exists yet, as a single atomic operation.  Returns `None` when
    /// some user already exists.
    async fn add_first_user(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Option<i64>, BackendError>;
    async fn count_users(
        &self,
    ) -> Result<i64, BackendError>;
    async fn get_user_by_id(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError>;
    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, BackendError>;
    async fn get_user_password(
        &self,
        user_id: i64,
    ) -> Result<String, BackendError>;
    async fn store_user_password(
        &self,
        user_id: i64,
        password: &str,
    ) -> Result<i64, BackendError>;
    async fn purge_user_passwords(
        &self,
        user_id: i64,
    ) -> Result<(), BackendError>;
}

#[async_trait]
pub trait SessionBackend {
    /// Persist the session, refreshing its last active timestamp if it
    /// already exists.  Returns the new last active timestamp.
    async fn save_session(
        &self,
        session: &Session,
    ) -> Result<i64, BackendError>;
    async fn load_session(
        &self,
        token: SessionToken,
    ) -> Result<Option<Session>, BackendError>;
    async fn purge_session(
        &self,
        token: SessionToken,
    ) -> Result<(), BackendError>;
    /// The returned sessions have their tokens blanked.
    async fn get_user_sessions(
        &self,
        user_id: i64,
    ) -> Result<Vec<Session>, BackendError>;
    /// Purge every session for the user, except for the one identified
    /// by `keep` if provided.
    async fn purge_user_sessions(
        &self,
        user_id: i64,
        keep: Option<SessionToken>,
    ) -> Result<(), BackendError>;
}
