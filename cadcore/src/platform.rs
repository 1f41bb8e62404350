mod access_control;
mod connector;
mod tracking;
pub use access_control::{DefaultACPlatform, ACPlatform};
pub use connector::{ConnectorOption, PlatformConnector};
pub use tracking::{DefaultTrackingPlatform, TrackingPlatform};

pub trait PlatformUrl {
    fn url(&self) -> &str;
}
