use cadac::platform::Builder as ACPlatformBuilder;
use cadcore::{
    ac::Identity,
    calendar::Calendar,
    completion::UncheckPolicy,
};
use cadctrl::platform::Platform;
use std::sync::Arc;

use crate::ac::create_sqlite_backend;

/// A controller platform over a single in-memory database, reading the
/// time from the test clock.
pub async fn create_sqlite_platform(
    calendar: Calendar,
    policy: UncheckPolicy,
) -> anyhow::Result<Platform> {
    let backend = Arc::new(create_sqlite_backend().await?);
    let platform = Platform::new(
        ACPlatformBuilder::from_arc(backend.clone())
            .password_autopurge(true)
            .build(),
        backend,
    )
        .with_calendar(calendar)
        .with_uncheck_policy(policy)
        .with_ts_source(crate::chrono::timestamp);
    Ok(platform)
}

/// As above with the default calendar and policy, and the admin
/// registered with the password `admin`.
pub async fn create_sqlite_platform_with_admin() -> anyhow::Result<(Platform, Identity)> {
    let platform = create_sqlite_platform(
        Calendar::default(),
        UncheckPolicy::default(),
    ).await?;
    let identity = platform
        .register_admin("admin@example.com", "admin", "Admin")
        .await?;
    Ok((platform, identity))
}
