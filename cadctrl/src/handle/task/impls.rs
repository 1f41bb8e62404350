use cadcore::{
    completion::{
        is_completed_now,
        ToggleOutcome,
    },
    task::{
        Task,
        TaskFields,
    },
};
use std::fmt;

use crate::{
    error::PlatformError,
    platform::Platform,
};

use super::{
    not_found,
    validated,
    TaskCtrl,
};

impl fmt::Debug for TaskCtrl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCtrl<'_>")
            .field("platform", &self.platform)
            .field("task.id", &self.task.id)
            .finish()
    }
}

impl<'p> TaskCtrl<'p> {
    pub(crate) fn new(
        platform: &'p Platform,
        task: Task,
    ) -> Self {
        Self {
            platform,
            task,
        }
    }

    pub fn id(&self) -> i64 {
        self.task.id
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn into_inner(self) -> Task {
        self.task
    }

    /// Whether the task counts as done right now, going by the
    /// completions loaded with it.
    pub fn is_completed_now(&self) -> bool {
        is_completed_now(
            &self.task,
            self.platform.now(),
            self.platform.calendar(),
        )
    }

    /// Re-read the task along with its completions.
    pub async fn refresh(&mut self) -> Result<(), PlatformError> {
        self.task = self.platform.tracking_platform
            .get_task_by_id(self.task.id, self.task.user_id)
            .await?
            .ok_or_else(|| not_found(self.task.id))?;
        Ok(())
    }

    pub async fn toggle(&mut self) -> Result<ToggleOutcome, PlatformError> {
        let outcome = self.platform.tracking_platform
            .toggle(
                self.task.id,
                self.task.user_id,
                self.platform.now(),
                self.platform.calendar(),
                self.platform.uncheck_policy(),
            )
            .await?
            .ok_or_else(|| not_found(self.task.id))?;
        self.refresh().await?;
        Ok(outcome)
    }

    pub async fn update(&mut self, fields: TaskFields) -> Result<(), PlatformError> {
        let fields = validated(fields)?;
        self.platform.tracking_platform
            .update_task(self.task.id, self.task.user_id, &fields)
            .await?
            .then_some(())
            .ok_or_else(|| not_found(self.task.id))?;
        log::info!("task {} updated", self.task.id);
        self.refresh().await
    }

    /// Remove the task along with its completion history.
    pub async fn delete(self) -> Result<(), PlatformError> {
        self.platform.tracking_platform
            .delete_task(self.task.id, self.task.user_id)
            .await?
            .then_some(())
            .ok_or_else(|| not_found(self.task.id))?;
        log::info!("task {} deleted", self.task.id);
        Ok(())
    }
}
