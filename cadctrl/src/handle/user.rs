use cadcore::ac::Identity;

use crate::platform::Platform;

/// Everything the identified user may do; every record reached through
/// here is owned by that user.
pub struct UserCtrl<'p> {
    pub(crate) platform: &'p Platform,
    pub(crate) identity: Identity,
}

mod impls;
