//! Access control for the single tenant: the admin registration gate,
//! password handling and login sessions.
pub mod error;
pub mod password;
pub mod platform;
pub mod session;
pub mod user;

pub use platform::Platform;
