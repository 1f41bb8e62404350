use cadcore::{
    calendar::Calendar,
    completion::UncheckPolicy,
    platform::TrackingPlatform,
};
use std::sync::Arc;

mod builder;
mod impls;

pub use builder::Builder;

#[derive(Clone)]
pub struct Platform {
    pub ac_platform: cadac::Platform,
    pub tracking_platform: Arc<dyn TrackingPlatform>,
    pub(crate) calendar: Calendar,
    pub(crate) uncheck_policy: UncheckPolicy,
    pub(crate) ts_source: Arc<dyn Fn() -> i64 + Send + Sync>,
}
