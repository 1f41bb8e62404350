use cadcore::{
    ac::Identity,
    completion::ToggleOutcome,
    goal::{
        Goal,
        GoalFields,
        Goals,
    },
    stats::{
        self,
        DayActivity,
        MonthTrend,
        Summary,
    },
    task::{
        Task,
        TaskFields,
        TaskQuery,
        Tasks,
    },
};
use chrono::NaiveDate;
use std::fmt;

use crate::{
    error::PlatformError,
    handle::{
        optional,
        required,
        task::{
            not_found,
            validated,
        },
        TaskCtrl,
    },
    platform::Platform,
};

use super::UserCtrl;

/// How many goals the dashboard shows.
pub const RECENT_GOALS: i64 = 3;

fn goal_not_found(id: i64) -> PlatformError {
    PlatformError::NotFound(format!("goal {id}"))
}

fn validated_goal(fields: GoalFields) -> Result<GoalFields, PlatformError> {
    Ok(GoalFields {
        title: required("title", &fields.title)?,
        description: optional(fields.description),
        ..fields
    })
}

impl fmt::Debug for UserCtrl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCtrl<'_>")
            .field("platform", &self.platform)
            .field("identity.id", &self.identity.id)
            .finish()
    }
}

impl<'p> UserCtrl<'p> {
    pub(crate) fn new(
        platform: &'p Platform,
        identity: Identity,
    ) -> Self {
        Self {
            platform,
            identity,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn id(&self) -> i64 {
        self.identity.id
    }
}

// Tasks

impl<'p> UserCtrl<'p> {
    pub async fn create_task(
        &self,
        fields: TaskFields,
    ) -> Result<TaskCtrl<'p>, PlatformError> {
        let fields = validated(fields)?;
        let id = self.platform.tracking_platform
            .add_task(self.id(), &fields)
            .await?;
        log::info!("user {} created task {id}", self.id());
        self.get_task(id).await
    }

    pub async fn get_task(
        &self,
        id: i64,
    ) -> Result<TaskCtrl<'p>, PlatformError> {
        let task = self.platform.tracking_platform
            .get_task_by_id(id, self.id())
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(TaskCtrl::new(self.platform, task))
    }

    pub async fn list_tasks(
        &self,
        query: &TaskQuery,
    ) -> Result<Tasks, PlatformError> {
        Ok(self.platform.tracking_platform
            .list_tasks(self.id(), query)
            .await?)
    }

    /// As `list_tasks`, keeping only the tasks whose effective
    /// completion for the current period matches `completed`.
    pub async fn list_tasks_by_completion(
        &self,
        query: &TaskQuery,
        completed: bool,
    ) -> Result<Vec<Task>, PlatformError> {
        let tasks = self.list_tasks(query).await?;
        Ok(stats::filter_by_completion(
            &tasks,
            completed,
            self.platform.now(),
            self.platform.calendar(),
        )
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn update_task(
        &self,
        id: i64,
        fields: TaskFields,
    ) -> Result<TaskCtrl<'p>, PlatformError> {
        let mut ctrl = self.get_task(id).await?;
        ctrl.update(fields).await?;
        Ok(ctrl)
    }

    pub async fn delete_task(
        &self,
        id: i64,
    ) -> Result<(), PlatformError> {
        self.platform.tracking_platform
            .delete_task(id, self.id())
            .await?
            .then_some(())
            .ok_or_else(|| not_found(id))?;
        log::info!("user {} deleted task {id}", self.id());
        Ok(())
    }

    /// Flip whether the task counts as done for the current period.
    pub async fn toggle_task(
        &self,
        id: i64,
    ) -> Result<ToggleOutcome, PlatformError> {
        self.platform.tracking_platform
            .toggle(
                id,
                self.id(),
                self.platform.now(),
                self.platform.calendar(),
                self.platform.uncheck_policy(),
            )
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn is_completed_now(
        &self,
        id: i64,
    ) -> Result<bool, PlatformError> {
        self.platform.tracking_platform
            .task_completed_now(
                id,
                self.id(),
                self.platform.now(),
                self.platform.calendar(),
            )
            .await?
            .ok_or_else(|| not_found(id))
    }
}

// Goals

impl UserCtrl<'_> {
    pub async fn create_goal(
        &self,
        fields: GoalFields,
    ) -> Result<Goal, PlatformError> {
        let fields = validated_goal(fields)?;
        let id = self.platform.tracking_platform
            .add_goal(self.id(), &fields)
            .await?;
        log::info!("user {} created goal {id}", self.id());
        self.get_goal(id).await
    }

    pub async fn get_goal(
        &self,
        id: i64,
    ) -> Result<Goal, PlatformError> {
        self.platform.tracking_platform
            .get_goal_by_id(id, self.id())
            .await?
            .ok_or_else(|| goal_not_found(id))
    }

    /// Newest first.
    pub async fn list_goals(
        &self,
        limit: Option<i64>,
    ) -> Result<Goals, PlatformError> {
        Ok(self.platform.tracking_platform
            .list_goals(self.id(), limit)
            .await?)
    }

    pub async fn recent_goals(&self) -> Result<Goals, PlatformError> {
        self.list_goals(Some(RECENT_GOALS)).await
    }

    pub async fn update_goal(
        &self,
        id: i64,
        fields: GoalFields,
    ) -> Result<Goal, PlatformError> {
        let fields = validated_goal(fields)?;
        self.platform.tracking_platform
            .update_goal(id, self.id(), &fields)
            .await?
            .then_some(())
            .ok_or_else(|| goal_not_found(id))?;
        log::info!("user {} updated goal {id}", self.id());
        self.get_goal(id).await
    }

    pub async fn delete_goal(
        &self,
        id: i64,
    ) -> Result<(), PlatformError> {
        self.platform.tracking_platform
            .delete_goal(id, self.id())
            .await?
            .then_some(())
            .ok_or_else(|| goal_not_found(id))?;
        log::info!("user {} deleted goal {id}", self.id());
        Ok(())
    }
}

// Aggregations

impl UserCtrl<'_> {
    pub async fn summary(&self) -> Result<Summary, PlatformError> {
        let tasks = self.platform.tracking_platform
            .all_tasks(self.id())
            .await?;
        Ok(Summary::from_tasks(&tasks))
    }

    /// Daily completion counts over every day of `year`.
    pub async fn heatmap(
        &self,
        year: i32,
    ) -> Result<Vec<DayActivity>, PlatformError> {
        let calendar = self.platform.calendar();
        let since = NaiveDate::from_ymd_opt(year, 1, 1)
            .map(|date| calendar.start_of(date));
        let completions = self.platform.tracking_platform
            .list_completions_for_user(self.id(), since)
            .await?;
        Ok(stats::contribution(&completions, year, calendar))
    }

    /// Completions per task category over the last twelve months.
    pub async fn trend(&self) -> Result<Vec<MonthTrend>, PlatformError> {
        let tasks = self.platform.tracking_platform
            .all_tasks(self.id())
            .await?;
        Ok(stats::monthly_trend(
            &tasks,
            self.platform.now(),
            self.platform.calendar(),
        ))
    }

    /// The tasks to show for `date`, today when absent.
    pub async fn agenda(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Task>, PlatformError> {
        let date = date.unwrap_or_else(|| self.platform.calendar()
            .date(self.platform.now()));
        let tasks = self.platform.tracking_platform
            .all_tasks(self.id())
            .await?;
        Ok(stats::agenda(&tasks, date)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use cadcore::{
        ac::Identity,
        completion::ToggleOutcome,
        goal::GoalFields,
        stats::Intensity,
        task::{
            Priority,
            Recurrence,
            Task,
            TaskCompletion,
            TaskFields,
            TaskQuery,
            TaskStatus,
        },
    };
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use std::sync::Arc;
    use test_cad::{
        ac::create_sqlite_platform,
        core::MockPlatform,
    };

    use crate::{
        error::PlatformError,
        platform::Platform,
    };

    // Friday, 2024-03-01T10:00:00Z
    const NOW: i64 = 1709287200;
    const DAY: i64 = 86400;

    async fn platform(mock: MockPlatform) -> anyhow::Result<Platform> {
        Ok(Platform::new(create_sqlite_platform(true).await?, Arc::new(mock))
            .with_ts_source(|| NOW))
    }

    fn identity() -> Identity {
        Identity {
            id: 1,
            name: "Admin".into(),
            email: "admin@example.com".into(),
        }
    }

    fn task(id: i64, recurrence: Recurrence, completed: &[i64]) -> Task {
        Task {
            id,
            user_id: 1,
            title: format!("task {id}"),
            description: None,
            recurrence,
            priority: Priority::Medium,
            due_date: None,
            status: TaskStatus::Pending,
            completed_ts: completed.last().copied(),
            created_ts: NOW - 30 * DAY,
            updated_ts: NOW - 30 * DAY,
            completions: Some(completed.iter()
                .enumerate()
                .map(|(n, ts)| TaskCompletion {
                    id: id * 100 + n as i64,
                    task_id: id,
                    completed_ts: *ts,
                })
                .collect::<Vec<_>>()
                .into()),
        }
    }

    #[async_std::test]
    async fn missing_or_foreign_is_not_found() -> anyhow::Result<()> {
        let mut mock = MockPlatform::new();
        mock.expect_task_get_by_id()
            .with(eq(7), eq(1))
            .returning(|_, _| Ok(None));
        mock.expect_task_toggle()
            .withf(|id, owner, now, _, _| *id == 7 && *owner == 1 && *now == NOW)
            .returning(|_, _, _, _, _| Ok(None));
        mock.expect_task_delete()
            .with(eq(7), eq(1))
            .returning(|_, _| Ok(false));
        mock.expect_goal_update()
            .returning(|_, _, _| Ok(false));
        let platform = platform(mock).await?;
        let ctrl = platform.authorize(identity());

        assert!(matches!(
            ctrl.get_task(7).await,
            Err(PlatformError::NotFound(msg)) if msg == "task 7",
        ));
        assert!(matches!(
            ctrl.is_completed_now(7).await,
            Err(PlatformError::NotFound(_)),
        ));
        assert!(matches!(
            ctrl.toggle_task(7).await,
            Err(PlatformError::NotFound(_)),
        ));
        assert!(matches!(
            ctrl.delete_task(7).await,
            Err(PlatformError::NotFound(_)),
        ));
        assert!(matches!(
            ctrl.update_task(7, TaskFields::new("Renamed")).await,
            Err(PlatformError::NotFound(_)),
        ));
        assert!(matches!(
            ctrl.update_goal(2, GoalFields::new("Renamed")).await,
            Err(PlatformError::NotFound(msg)) if msg == "goal 2",
        ));
        Ok(())
    }

    #[async_std::test]
    async fn blank_titles_are_rejected() -> anyhow::Result<()> {
        // the backend is never reached
        let platform = platform(MockPlatform::new()).await?;
        let ctrl = platform.authorize(identity());
        assert!(matches!(
            ctrl.create_task(TaskFields::new("   ")).await,
            Err(PlatformError::Validation(msg)) if msg == "title is required",
        ));
        assert!(matches!(
            ctrl.create_goal(GoalFields::new("")).await,
            Err(PlatformError::Validation(_)),
        ));
        Ok(())
    }

    #[async_std::test]
    async fn create_task_trims_fields() -> anyhow::Result<()> {
        let mut mock = MockPlatform::new();
        mock.expect_task_add()
            .times(1)
            .withf(|owner, fields| *owner == 1
                && fields.title == "Stretch"
                && fields.description.is_none()
                && fields.recurrence == Recurrence::Daily)
            .returning(|_, _| Ok(3));
        mock.expect_task_get_by_id()
            .with(eq(3), eq(1))
            .returning(|_, _| Ok(Some(task(3, Recurrence::Daily, &[]))));
        let platform = platform(mock).await?;
        let ctrl = platform.authorize(identity());
        let task = ctrl.create_task(
            TaskFields::new("  Stretch ")
                .description(" ")
                .recurrence(Recurrence::Daily)
        ).await?;
        assert_eq!(task.id(), 3);
        assert!(!task.is_completed_now());
        Ok(())
    }

    #[async_std::test]
    async fn effective_completion() -> anyhow::Result<()> {
        let mut mock = MockPlatform::new();
        mock.expect_task_list()
            .returning(|_, _| {
                let mut once = task(3, Recurrence::Once, &[NOW - 40 * DAY]);
                once.status = TaskStatus::Completed;
                Ok(vec![
                    // done an hour ago
                    task(1, Recurrence::Daily, &[NOW - 3600]),
                    // only done yesterday
                    task(2, Recurrence::Daily, &[NOW - DAY]),
                    once,
                    // done last week, on Saturday 2024-02-24
                    task(4, Recurrence::Weekly, &[NOW - 6 * DAY]),
                ].into())
            });
        mock.expect_task_toggle()
            .withf(|id, _, now, _, _| *id == 2 && *now == NOW)
            .returning(|_, _, _, _, _| Ok(Some(ToggleOutcome {
                completed: true,
                inserted: Some(TaskCompletion {
                    id: 201,
                    task_id: 2,
                    completed_ts: NOW,
                }),
                deleted: None,
            })));
        let platform = platform(mock).await?;
        let ctrl = platform.authorize(identity());

        let done = ctrl.list_tasks_by_completion(&TaskQuery::new(), true).await?;
        assert_eq!(done.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 3]);
        let pending = ctrl.list_tasks_by_completion(&TaskQuery::new(), false).await?;
        assert_eq!(pending.iter().map(|t| t.id).collect::<Vec<_>>(), [2, 4]);

        // the summary goes by the stored status only
        let summary = ctrl.summary().await?;
        assert_eq!(summary.total, 4);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.pending, 3);
        assert_eq!(summary.completion_rate, 25);

        let outcome = ctrl.toggle_task(2).await?;
        assert!(outcome.completed);
        assert_eq!(outcome.inserted.map(|c| c.id), Some(201));
        Ok(())
    }

    #[async_std::test]
    async fn heatmap_starts_at_the_local_new_year() -> anyhow::Result<()> {
        let mut mock = MockPlatform::new();
        mock.expect_completion_list_for_user()
            // 2024-01-01T00:00:00Z
            .with(eq(1), eq(Some(1704067200)))
            .returning(|_, _| Ok(vec![
                TaskCompletion { id: 1, task_id: 1, completed_ts: NOW },
                TaskCompletion { id: 2, task_id: 2, completed_ts: NOW + 60 },
                TaskCompletion { id: 3, task_id: 1, completed_ts: NOW - DAY },
            ]));
        let platform = platform(mock).await?;
        let ctrl = platform.authorize(identity());
        let days = ctrl.heatmap(2024).await?;
        assert_eq!(days.len(), 366);
        let march_1 = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        let day = days.iter()
            .find(|d| d.date == march_1)
            .expect("every day is present");
        assert_eq!(day.count, 2);
        assert_eq!(day.intensity, Intensity::LowMedium);
        assert_eq!(days.iter().map(|d| d.count).sum::<usize>(), 3);
        Ok(())
    }

    #[async_std::test]
    async fn agenda_defaults_to_today() -> anyhow::Result<()> {
        let mut mock = MockPlatform::new();
        mock.expect_task_list()
            .returning(|_, _| {
                let mut due_today = task(2, Recurrence::Once, &[]);
                due_today.due_date = NaiveDate::from_ymd_opt(2024, 3, 1);
                let mut due_later = task(3, Recurrence::Once, &[]);
                due_later.due_date = NaiveDate::from_ymd_opt(2024, 3, 2);
                Ok(vec![
                    task(1, Recurrence::Daily, &[]),
                    due_today,
                    due_later,
                    task(4, Recurrence::Weekly, &[]),
                ].into())
            });
        let platform = platform(mock).await?;
        let ctrl = platform.authorize(identity());
        let today = ctrl.agenda(None).await?;
        assert_eq!(today.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 2]);
        let tomorrow = ctrl.agenda(NaiveDate::from_ymd_opt(2024, 3, 2)).await?;
        assert_eq!(tomorrow.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 3]);
        Ok(())
    }
}
