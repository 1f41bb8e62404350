use cadcore::{
    ac::session::SessionFactory,
    platform::ACPlatform,
};
use std::sync::Arc;

pub struct Builder {
    // platform
    ac_platform: Arc<dyn ACPlatform>,
    // automatically purges all but the most recent passwords
    password_autopurge: bool,
    session_factory: SessionFactory,
}

struct PlatformInner {
    ac_platform: Arc<dyn ACPlatform>,
    password_autopurge: bool,
    session_factory: SessionFactory,
}

#[derive(Clone)]
pub struct Platform(Arc<PlatformInner>);

mod impls;
