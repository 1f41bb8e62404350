use async_trait::async_trait;
use crate::{
    platform::PlatformUrl,
    ac::traits::{
        SessionBackend,
        UserBackend,
    },
};

/// ACPlatform - Access Control Platform
///
/// Persists the registered user, their password hashes and sessions.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
#[async_trait]
pub trait ACPlatform: UserBackend
    + SessionBackend

    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn ACPlatform;
}

pub trait DefaultACPlatform: ACPlatform {}

impl<P: UserBackend
    + SessionBackend

    + PlatformUrl

    + DefaultACPlatform

    + Send
    + Sync
> ACPlatform for P {
    fn as_dyn(&self) -> &(dyn ACPlatform) {
        self
    }
}
