use async_trait::async_trait;
use crate::{
    completion::{
        is_completed_now,
        ToggleOutcome,
        UncheckPolicy,
    },
    calendar::Calendar,
    error::BackendError,
    goal::traits::GoalBackend,
    platform::PlatformUrl,
    task::{
        Tasks,
        TaskQuery,
        traits::{
            TaskBackend,
            TaskCompletionBackend,
        },
    },
};

/// TrackingPlatform - the tasks, their completion history and goals.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
#[async_trait]
pub trait TrackingPlatform: TaskBackend
    + TaskCompletionBackend
    + GoalBackend

    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn TrackingPlatform;

    /// Whether the task counts as done for the period containing `now`;
    /// `None` if the task was not found.
    async fn task_completed_now(
        &self,
        id: i64,
        owner: i64,
        now: i64,
        calendar: &Calendar,
    ) -> Result<Option<bool>, BackendError> {
        Ok(TaskBackend::get_task_by_id(self, id, owner)
            .await?
            .map(|task| is_completed_now(&task, now, calendar)))
    }

    /// Toggle the task, logging what was done.
    async fn toggle(
        &self,
        id: i64,
        owner: i64,
        now: i64,
        calendar: &Calendar,
        policy: UncheckPolicy,
    ) -> Result<Option<ToggleOutcome>, BackendError> {
        let outcome = TaskBackend::toggle_task(self, id, owner, now, calendar, policy)
            .await?;
        if let Some(outcome) = &outcome {
            log::info!(
                "task {id} toggled to {}; inserted: {:?}; deleted: {:?}",
                if outcome.completed { "completed" } else { "pending" },
                outcome.inserted.as_ref().map(|c| c.id),
                outcome.deleted,
            );
        }
        Ok(outcome)
    }

    /// All tasks of the owner with their completions, oldest first.
    async fn all_tasks(
        &self,
        owner: i64,
    ) -> Result<Tasks, BackendError> {
        TaskBackend::list_tasks(
            self,
            owner,
            &TaskQuery::new().order(crate::task::TaskOrder::CreatedAsc),
        ).await
    }
}

pub trait DefaultTrackingPlatform: TrackingPlatform {}

impl<P: TaskBackend
    + TaskCompletionBackend
    + GoalBackend

    + PlatformUrl

    + DefaultTrackingPlatform

    + Send
    + Sync
> TrackingPlatform for P {
    fn as_dyn(&self) -> &(dyn TrackingPlatform) {
        self
    }
}
