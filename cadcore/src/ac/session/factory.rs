use chrono::Utc;
use rand::{
    Rng,
    RngCore,
};
use std::sync::Mutex;

use super::{
    Session,
    SessionToken,
};

#[derive(Default)]
pub struct SessionTokenFactory {
    rng: Option<Mutex<Box<dyn RngCore + Send>>>,
}

impl SessionTokenFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the provided rng instead of the thread local one, mostly so
    /// that tests can produce stable tokens.
    pub fn rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Mutex::new(Box::new(rng)));
        self
    }

    pub fn create(&self) -> SessionToken {
        SessionToken(
            self.rng
                .as_ref()
                .and_then(|m| m.lock().ok().map(|mut rng| rng.gen()))
                .unwrap_or_else(|| rand::thread_rng().gen())
        )
    }
}

#[derive(Default)]
pub struct SessionFactory {
    token_factory: SessionTokenFactory,
    ts_source: Option<Box<dyn Fn() -> i64 + Send + Sync + 'static>>,
}

impl SessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_factory(mut self, val: SessionTokenFactory) -> Self {
        self.token_factory = val;
        self
    }

    pub fn ts_source(mut self, val: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.ts_source = Some(Box::new(val));
        self
    }

    pub fn create(
        &self,
        user_id: i64,
        origin: impl Into<String>,
    ) -> Session {
        let created_ts = self.ts_source
            .as_ref()
            .map(|f| f())
            .unwrap_or_else(|| Utc::now().timestamp());
        Session {
            token: self.token_factory.create(),
            user_id,
            origin: origin.into(),
            created_ts,
            last_active_ts: created_ts,
        }
    }
}
