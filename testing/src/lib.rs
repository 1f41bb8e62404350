#[cfg(feature = "ac")]
pub mod ac;
#[cfg(feature = "chrono")]
pub mod chrono;
pub mod core;
#[cfg(feature = "platform")]
pub mod ctrl;
#[cfg(feature = "rand")]
pub mod rand;

/// Compile time check that `T` may be shared across threads.
pub fn is_send_sync<T: Send + Sync>(_: &T) {}
