use cadac::platform::{
    Builder,
    Platform,
};
use cadcore::ac::session::{
    SessionFactory,
    SessionTokenFactory,
};
use caddb_sqlite::SqliteBackend;

use crate::rand::MockRng;

pub async fn create_sqlite_backend() -> anyhow::Result<SqliteBackend> {
    Ok(SqliteBackend::connect("sqlite::memory:".into())
        .await?
        .migrate()
        .await?)
}

/// An access control platform over a fresh in-memory database, issuing
/// sessions stamped by the test clock with tokens from a fixed byte
/// sequence.
pub async fn create_sqlite_platform(purge: bool) -> anyhow::Result<Platform> {
    let session_factory = SessionFactory::new()
        .token_factory(SessionTokenFactory::new()
            .rng(MockRng::new((0u8..=255).collect::<Vec<_>>())))
        .ts_source(crate::chrono::timestamp);
    let platform = Builder::new(create_sqlite_backend().await?)
        .password_autopurge(purge)
        .session_factory(session_factory)
        .build();
    Ok(platform)
}

/// As above, with the admin already registered.
pub async fn create_sqlite_platform_with_admin(
    email: &str,
    password: &str,
) -> anyhow::Result<Platform> {
    let platform = create_sqlite_platform(true).await?;
    platform.register_admin(email, password, "Admin").await?;
    Ok(platform)
}
