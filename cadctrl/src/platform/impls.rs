use cadac::session::Session;
use cadcore::{
    ac::{
        session::SessionToken,
        Identity,
    },
    calendar::Calendar,
    completion::UncheckPolicy,
    platform::TrackingPlatform,
};
use chrono::Utc;
use std::{
    fmt,
    sync::Arc,
};

use crate::{
    error::PlatformError,
    handle::UserCtrl,
};
use super::Platform;

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("tracking_platform", &self.tracking_platform.url())
            .field("calendar", &self.calendar)
            .field("uncheck_policy", &self.uncheck_policy)
            .finish()
    }
}

impl Platform {
    pub fn new(
        ac_platform: cadac::Platform,
        tracking_platform: Arc<dyn TrackingPlatform>,
    ) -> Self {
        Self {
            ac_platform,
            tracking_platform,
            calendar: Calendar::default(),
            uncheck_policy: UncheckPolicy::default(),
            ts_source: Arc::new(|| Utc::now().timestamp()),
        }
    }

    pub fn with_calendar(mut self, val: Calendar) -> Self {
        self.calendar = val;
        self
    }

    pub fn with_uncheck_policy(mut self, val: UncheckPolicy) -> Self {
        self.uncheck_policy = val;
        self
    }

    /// Replace the clock used for every "now" this platform evaluates.
    pub fn with_ts_source(mut self, val: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.ts_source = Arc::new(val);
        self
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn uncheck_policy(&self) -> UncheckPolicy {
        self.uncheck_policy
    }

    pub fn now(&self) -> i64 {
        (self.ts_source)()
    }
}

// Identity management.
impl Platform {
    pub async fn register_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Identity, PlatformError> {
        Ok(self.ac_platform
            .register_admin(email, password, name)
            .await?
            .identity())
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        origin: String,
    ) -> Result<Session, PlatformError> {
        Ok(self.ac_platform
            .authenticate_user_login(email, password, origin)
            .await?)
    }

    /// Logout the session identified by the token; returns whether there
    /// was such a session.
    pub async fn logout(
        &self,
        token: SessionToken,
    ) -> Result<bool, PlatformError> {
        match self.ac_platform.load_session(token).await? {
            Some(session) => {
                session.logout().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve the caller's identity; its absence is `Unauthorized`.
    pub async fn identify(
        &self,
        token: Option<SessionToken>,
    ) -> Result<Identity, PlatformError> {
        self.ac_platform
            .current_identity(token)
            .await?
            .ok_or(PlatformError::Unauthorized)
    }

    /// Scope every further operation to the identity.
    pub fn authorize(&self, identity: Identity) -> UserCtrl<'_> {
        UserCtrl::new(self, identity)
    }

    pub async fn user_ctrl(
        &self,
        token: Option<SessionToken>,
    ) -> Result<UserCtrl<'_>, PlatformError> {
        Ok(self.authorize(self.identify(token).await?))
    }
}
