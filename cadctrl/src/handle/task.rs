use cadcore::task::{
    Task,
    TaskFields,
};

use crate::{
    error::PlatformError,
    handle::{
        optional,
        required,
    },
    platform::Platform,
};

pub struct TaskCtrl<'p> {
    pub(crate) platform: &'p Platform,
    pub(crate) task: Task,
}

pub(crate) fn not_found(id: i64) -> PlatformError {
    PlatformError::NotFound(format!("task {id}"))
}

pub(crate) fn validated(fields: TaskFields) -> Result<TaskFields, PlatformError> {
    Ok(TaskFields {
        title: required("title", &fields.title)?,
        description: optional(fields.description),
        ..fields
    })
}

mod impls;
