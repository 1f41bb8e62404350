pub mod identity;
pub mod session;
pub mod traits;
pub mod user;

pub use self::identity::Identity;
