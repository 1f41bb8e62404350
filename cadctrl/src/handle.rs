use crate::error::PlatformError;

mod task;
mod user;

pub use task::TaskCtrl;
pub use user::UserCtrl;

/// Trimmed value of a field that must not be blank.
fn required(name: &str, value: &str) -> Result<String, PlatformError> {
    match value.trim() {
        "" => Err(PlatformError::Validation(format!("{name} is required"))),
        s => Ok(s.to_string()),
    }
}

/// Blank optional text is stored as absent.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
