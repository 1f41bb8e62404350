use cadcore::{
    ac::{
        session::{
            self,
            SessionFactory,
            SessionToken,
        },
        user,
        Identity,
    },
    error::BackendError,
    platform::ACPlatform,
};
use std::sync::Arc;

use crate::{
    error::{
        AuthenticationError,
        Error,
        PasswordError,
    },
    user::User,
    password::{
        Password,
        PasswordStatus,
    },
    session::Session,
};

use super::*;

pub(crate) const ADMIN_EXISTS: &str = "Admin already exists. Registration disabled.";

impl Builder {
    pub fn new(ac_platform: impl ACPlatform + 'static) -> Self {
        Self::from_arc(Arc::new(ac_platform))
    }

    pub fn from_arc(ac_platform: Arc<dyn ACPlatform>) -> Self {
        Self {
            ac_platform,
            password_autopurge: false,
            session_factory: SessionFactory::default(),
        }
    }

    pub fn password_autopurge(mut self, val: bool) -> Self {
        self.password_autopurge = val;
        self
    }

    pub fn session_factory(mut self, val: SessionFactory) -> Self {
        self.session_factory = val;
        self
    }

    pub fn build(self) -> Platform {
        Platform(Arc::new(PlatformInner {
            ac_platform: self.ac_platform,
            password_autopurge: self.password_autopurge,
            session_factory: self.session_factory,
        }))
    }
}

impl Platform {
    pub(crate) fn ac_platform(&self) -> &dyn ACPlatform {
        self.0.ac_platform.as_ref()
    }

    async fn stored_password(&self, id: i64) -> Result<String, Error> {
        Ok(self.0.ac_platform.get_user_password(id).await?)
    }
}

// User management.
impl Platform {
    /// Create the one and only user of this installation.  Registration
    /// is closed for good once any user exists.
    pub async fn register_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, Error> {
        let email = email.trim();
        let name = name.trim();
        if email.is_empty() || password.trim().is_empty() {
            Err(Error::Validation("Missing email or password".into()))?
        }
        // fast path before paying for the hash; the insert below is the
        // authoritative check.
        if self.user_count().await? > 0 {
            log::warn!("registration attempted for <{email}> while an admin exists");
            Err(Error::Conflict(ADMIN_EXISTS.into()))?
        }
        let password_hash = Password::new(password).to_database()?;
        let id = self.0.ac_platform
            .add_first_user(email, name, &password_hash)
            .await?
            .ok_or_else(|| Error::Conflict(ADMIN_EXISTS.into()))?;
        log::info!("registered admin user {id} <{email}>");
        self.get_user(id).await?
            .ok_or_else(|| BackendError::AppInvariantViolation(
                format!("user {id} missing right after registration")
            ).into())
    }

    pub async fn user_count(&self) -> Result<i64, Error> {
        Ok(self.0.ac_platform.count_users().await?)
    }

    pub async fn get_user(
        &self,
        id: i64,
    ) -> Result<Option<User>, Error> {
        let user = self.0.ac_platform.get_user_by_id(id).await?
            .map(|user| User::new(self.clone(), user));
        Ok(user)
    }

    pub async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, Error> {
        let user = self.0.ac_platform.get_user_by_email(email.trim()).await?
            .ok_or(AuthenticationError::UnknownUser)?;
        self.verify_user_id_password(user.id, password).await?;
        Ok(User::new(self.clone(), user))
    }

    pub async fn login_status(
        &self,
        email: &str,
    ) -> Result<(user::User, PasswordStatus), Error> {
        let user = self.0.ac_platform.get_user_by_email(email.trim()).await?
            .ok_or(AuthenticationError::UnknownUser)?;
        let result = self.stored_password(user.id).await;
        let password = result
            .as_deref()
            .map(Password::from_database)
            .unwrap_or(Password::Misconfigured);
        Ok((user, password.into()))
    }
}

// Password management

impl Platform {
    /// Set a user's password using the user's id using the provided
    /// `&str` if a new password may be set.  This will only set the
    /// desired password iff the stored password is New or Reset.
    pub async fn new_user_id_password(
        &self,
        id: i64,
        password: &str,
    ) -> Result<(), Error> {
        let result = self.stored_password(id).await;
        let stored_password = result
            .as_deref()
            .map(Password::from_database)
            .unwrap_or(Password::Misconfigured);
        match stored_password {
            Password::New | Password::Reset =>
                self.force_user_id_password(
                    id,
                    Password::new(password)
                ).await,
            Password::Hash(_) => Err(PasswordError::Existing)?,
            Password::Restricted => Err(AuthenticationError::Restricted)?,
            _ => Err(Error::Misconfiguration),
        }
    }

    /// Verify the incoming string as a raw password against the hashed
    /// version stored for the user.
    pub async fn verify_user_id_password(
        &self,
        id: i64,
        password: &str,
    ) -> Result<(), Error> {
        let result = self.stored_password(id).await;
        let stored_password = result
            .as_deref()
            .map(Password::from_database)
            .unwrap_or(Password::Misconfigured);
        if let Password::Restricted = stored_password {
            Err(AuthenticationError::Restricted)?
        }
        stored_password.verify(&Password::new(password))
            .map_err(AuthenticationError::Password)?;
        Ok(())
    }

    /// Forcibly set a user's password using the user's id using the
    /// provided `Password`
    pub async fn force_user_id_password(
        &self,
        id: i64,
        password: Password<'_>,
    ) -> Result<(), Error> {
        let status = PasswordStatus::from(&password);
        let password_hash = password.to_database()?;
        if self.0.password_autopurge {
            self.0.ac_platform.purge_user_passwords(id).await?;
        }
        self.0.ac_platform.store_user_password(id, &password_hash).await?;
        log::info!("password for user {id} set to {status}");
        Ok(())
    }
}

// Session management

impl Platform {
    pub async fn new_user_session(
        &self,
        user: User,
        origin: String,
    ) -> Result<Session, Error> {
        let session = self.0.session_factory.create(user.id(), origin);
        self.0.ac_platform.save_session(&session).await?;
        log::debug!("new session for user {}", user.id());
        Ok(Session::new(self.clone(), session, user))
    }

    /// Returns `None` for an unknown token, or for a session whose user
    /// no longer exists.
    pub async fn load_session(
        &self,
        token: SessionToken,
    ) -> Result<Option<Session>, Error> {
        let Some(session) = self.0.ac_platform.load_session(token).await? else {
            return Ok(None);
        };
        let Some(user) = self.get_user(session.user_id).await? else {
            log::warn!("session {token:?} references missing user {}", session.user_id);
            return Ok(None);
        };
        Ok(Some(Session::new(self.clone(), session, user)))
    }

    /// Simply return a list of sessions without the token for the user_id
    pub async fn get_user_sessions(
        &self,
        user_id: i64,
    ) -> Result<Vec<session::Session>, Error> {
        Ok(self.0.ac_platform.get_user_sessions(user_id).await?)
    }

    /// Logout all sessions associated with the user_id.
    pub async fn logout_user(
        &self,
        user_id: i64,
    ) -> Result<(), Error> {
        Ok(self.0.ac_platform.purge_user_sessions(user_id, None).await?)
    }
}

// Login methods

impl Platform {
    pub async fn authenticate_user_login(
        &self,
        email: &str,
        password: &str,
        origin: String,
    ) -> Result<Session, Error> {
        let user = self.authenticate_user(email, password).await?;
        let session = self.new_user_session(user, origin).await?;
        Ok(session)
    }

    /// The session provider: resolve the identity of the caller holding
    /// the token, refreshing the session's last active timestamp.  An
    /// absent or unknown token yields `None`.
    pub async fn current_identity(
        &self,
        token: Option<SessionToken>,
    ) -> Result<Option<Identity>, Error> {
        let Some(token) = token else {
            return Ok(None);
        };
        let Some(session) = self.load_session(token).await? else {
            return Ok(None);
        };
        session.save().await?;
        Ok(Some(session.user().identity()))
    }
}
