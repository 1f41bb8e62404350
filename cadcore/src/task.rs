use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How often a task is expected to be done.  Everything other than
/// `Once` is tracked per calendar period through its completions.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
pub enum Recurrence {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Only meaningful for non-recurring tasks.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TaskCompletion {
    pub id: i64,
    pub task_id: i64,
    pub completed_ts: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TaskCompletions(Vec<TaskCompletion>);

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub recurrence: Recurrence,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    /// Last time this was marked done; for display and sorting only.
    pub completed_ts: Option<i64>,
    pub created_ts: i64,
    pub updated_ts: i64,

    pub completions: Option<TaskCompletions>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Tasks(Vec<Task>);

/// The user editable fields of a task, as provided on creation or
/// update.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub recurrence: Recurrence,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TaskOrder {
    CreatedAsc,
    #[default]
    CreatedDesc,
}

/// Equality filters and ordering for task listings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub recurrence: Option<Recurrence>,
    pub order: TaskOrder,
    pub limit: Option<i64>,
}

#[cfg(feature = "display")]
mod display;
mod impls;
pub mod traits;

pub use impls::parse_date;
