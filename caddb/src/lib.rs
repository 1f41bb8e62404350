//! Select a concrete backend from the scheme of a database url.

use cadcore::platform::{
    ACPlatform,
    ConnectorOption,
    TrackingPlatform,
};
#[cfg(feature = "sqlite")]
use cadcore::platform::PlatformConnector;
#[cfg(feature = "sqlite")]
use caddb_sqlite::SqliteBackend;
use std::sync::Arc;

pub struct Backend;

#[derive(Clone, Debug, PartialEq)]
pub struct Error(String);

#[derive(Debug)]
enum BackendKind {
    Sqlite,
}

mod display {
    use super::{BackendKind, Error};
    use std::fmt::{Display, Formatter, Result};

    impl Display for BackendKind {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            match self {
                Self::Sqlite => "sqlite".fmt(f),
            }
        }
    }

    impl Display for Error {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            self.0.fmt(f)
        }
    }

    impl std::error::Error for Error {}
}

impl TryFrom<&str> for BackendKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.split(':').next() {
            Some("sqlite") => Ok(BackendKind::Sqlite),
            _ => Err(Error(format!("The connection string {s:?} is unsupported.")))
        }
    }
}

impl Backend {
    pub async fn ac(
        opts: impl Into<ConnectorOption> + Send,
    ) -> Result<Arc<dyn ACPlatform>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let opts = opts.into();
        match BackendKind::try_from(opts.url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => Ok(Arc::new(SqliteBackend::ac(opts).await?)),
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for caddb in order to connect to {:?}",
                opts.url,
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }

    pub async fn tracking(
        opts: impl Into<ConnectorOption> + Send,
    ) -> Result<Arc<dyn TrackingPlatform>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let opts = opts.into();
        match BackendKind::try_from(opts.url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => Ok(Arc::new(SqliteBackend::tracking(opts).await?)),
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for caddb in order to connect to {:?}",
                opts.url,
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Both platforms over a single connection, so that they share the
    /// same database even when it only lives in memory.
    pub async fn platforms(
        opts: impl Into<ConnectorOption> + Send,
    ) -> Result<
        (Arc<dyn ACPlatform>, Arc<dyn TrackingPlatform>),
        Box<dyn std::error::Error + Send + Sync + 'static>,
    > {
        let opts = opts.into();
        match BackendKind::try_from(opts.url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => {
                let backend = Arc::new(SqliteBackend::connect(opts)
                    .await?
                    .migrate()
                    .await?);
                let ac: Arc<dyn ACPlatform> = backend.clone();
                let tracking: Arc<dyn TrackingPlatform> = backend;
                Ok((ac, tracking))
            }
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for caddb in order to connect to {:?}",
                opts.url,
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }
}
