use async_trait::async_trait;

use crate::{
    calendar::Calendar,
    completion::{
        ToggleOutcome,
        UncheckPolicy,
    },
    error::BackendError,
    task::{
        Task,
        TaskCompletion,
        TaskCompletions,
        TaskFields,
        TaskQuery,
        Tasks,
    },
};

/// Every method that takes an `owner` only ever sees the tasks of that
/// user; a task owned by someone else behaves as if it did not exist.
#[async_trait]
pub trait TaskBackend {
    async fn add_task(
        &self,
        owner: i64,
        fields: &TaskFields,
    ) -> Result<i64, BackendError>;
    /// The returned task has its completions loaded.
    async fn get_task_by_id(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<Option<Task>, BackendError>;
    /// The returned tasks have their completions loaded.
    async fn list_tasks(
        &self,
        owner: i64,
        query: &TaskQuery,
    ) -> Result<Tasks, BackendError>;
    async fn update_task(
        &self,
        id: i64,
        owner: i64,
        fields: &TaskFields,
    ) -> Result<bool, BackendError>;
    /// Removes the task together with all of its completions.
    async fn delete_task(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<bool, BackendError>;
    /// Flip the effective completion of the task for the period that
    /// contains `now`, reading and writing within one transaction.
    /// Returns `None` if the task was not found.
    async fn toggle_task(
        &self,
        id: i64,
        owner: i64,
        now: i64,
        calendar: &Calendar,
        policy: UncheckPolicy,
    ) -> Result<Option<ToggleOutcome>, BackendError>;
}

#[async_trait]
pub trait TaskCompletionBackend {
    async fn insert_completion(
        &self,
        task_id: i64,
        completed_ts: i64,
    ) -> Result<TaskCompletion, BackendError>;
    async fn delete_completion(
        &self,
        id: i64,
    ) -> Result<bool, BackendError>;
    /// Ordered by `completed_ts` ascending.
    async fn list_completions_for_task(
        &self,
        task_id: i64,
    ) -> Result<TaskCompletions, BackendError>;
    /// Every completion of every task owned by the user, optionally
    /// restricted to `completed_ts >= since`.
    async fn list_completions_for_user(
        &self,
        owner: i64,
        since: Option<i64>,
    ) -> Result<Vec<TaskCompletion>, BackendError>;
}
