use cadcore::error::{
    BackendError,
    ValueError,
};
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Access(#[from] cadac::error::Error),
    #[error(transparent)]
    Value(#[from] ValueError),
    /// No identity could be resolved for the caller.
    #[error("unauthorized: sign in first")]
    Unauthorized,
    /// The record is absent, or is owned by someone else.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation error: {0}")]
    Validation(String),
}
