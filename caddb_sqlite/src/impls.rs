use async_trait::async_trait;
use cadcore::{
    error::ValueError,
    platform::{
        ACPlatform,
        ConnectorOption,
        PlatformConnector,
        PlatformUrl,
        TrackingPlatform,
    },
};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    str::FromStr,
    sync::Arc,
};

use crate::SqliteBackend;

impl PlatformUrl for SqliteBackend {
    fn url(&self) -> &str {
        self.url.as_ref()
    }
}

impl SqliteBackend {
    pub async fn connect(opts: ConnectorOption) -> Result<SqliteBackend, sqlx::Error> {
        if opts.auto_create_db && !Sqlite::database_exists(&opts.url).await.unwrap_or(false) {
            log::warn!("sqlite database {} does not exist; creating...", &opts.url);
            Sqlite::create_database(&opts.url).await?
        }

        let pool = SqlitePool::connect(&opts.url).await?;
        Ok(SqliteBackend {
            pool: Arc::new(pool),
            url: opts.url,
        })
    }

    pub async fn migrate(self) -> Result<Self, sqlx::Error> {
        sqlx::migrate!("migrations/cadence").run(&*self.pool).await?;
        Ok(self)
    }
}

#[async_trait]
impl PlatformConnector for SqliteBackend {
    async fn ac(opts: ConnectorOption) -> Result<impl ACPlatform, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let backend = SqliteBackend::connect(opts).await
            .map_err(Box::new)?
            .migrate()
            .await
            .map_err(Box::new)?;
        Ok(backend)
    }

    async fn tracking(opts: ConnectorOption) -> Result<impl TrackingPlatform, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let backend = SqliteBackend::connect(opts).await
            .map_err(Box::new)?
            .migrate()
            .await
            .map_err(Box::new)?;
        Ok(backend)
    }
}

/// Decode a stored text tag into its typed value.
pub(crate) fn decode_tag<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ValueError>,
{
    value.parse::<T>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

pub(crate) fn decode_date(
    value: Option<String>,
) -> Result<Option<chrono::NaiveDate>, sqlx::Error> {
    value.as_deref()
        .map(cadcore::task::parse_date)
        .transpose()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

pub(crate) fn encode_date(value: Option<chrono::NaiveDate>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d").to_string())
}

mod ac;

mod goal;
mod task;
mod task_completion;

mod default_impl {
    use cadcore::platform::{
        DefaultACPlatform,
        DefaultTrackingPlatform,
    };
    use crate::SqliteBackend;

    impl DefaultACPlatform for SqliteBackend {}
    impl DefaultTrackingPlatform for SqliteBackend {}
}
