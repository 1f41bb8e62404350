//! Completion tracking for tasks.
//!
//! A recurring task is done for "now" when one of its completions falls
//! within the same calendar period as now, per its [`Recurrence`].  A
//! task that is done once relies on its stored status instead.
//!
//! Toggling is split in two: [`plan_toggle`] decides what has to be
//! written given the task with its completions, and the backend applies
//! the resulting [`TogglePlan`] in a single transaction.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
};

use crate::{
    calendar::Calendar,
    error::ValueError,
    task::{
        Recurrence,
        Task,
        TaskCompletion,
        TaskStatus,
    },
};

/// What happens to the completion records of a task that is done once
/// when it gets unchecked.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum UncheckPolicy {
    /// Records are kept; only the status and timestamp are reset.
    #[default]
    Asymmetric,
    /// The most recent record is removed as well.
    Symmetric,
}

/// The writes required to toggle a task.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TogglePlan {
    pub task_id: i64,
    /// Whether the task counts as completed once the plan is applied.
    pub completed: bool,
    pub status: TaskStatus,
    pub completed_ts: Option<i64>,
    /// Timestamp of a new completion record to insert.
    pub insert: Option<i64>,
    /// Id of the completion record to delete.
    pub delete: Option<i64>,
}

/// What a toggle ended up doing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ToggleOutcome {
    pub completed: bool,
    pub inserted: Option<TaskCompletion>,
    pub deleted: Option<i64>,
}

impl UncheckPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UncheckPolicy::Asymmetric => "asymmetric",
            UncheckPolicy::Symmetric => "symmetric",
        }
    }
}

impl fmt::Display for UncheckPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl FromStr for UncheckPolicy {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asymmetric" => Ok(UncheckPolicy::Asymmetric),
            "symmetric" => Ok(UncheckPolicy::Symmetric),
            _ => Err(ValueError::Unsupported(format!("{s:?} is not an uncheck policy"))),
        }
    }
}

/// The completion of a recurring task that falls within the period
/// containing `now`, if any.  Always `None` for tasks done once.
pub fn find_period_completion<'a>(
    task: &'a Task,
    now: i64,
    calendar: &Calendar,
) -> Option<&'a TaskCompletion> {
    let period = task.recurrence.period()?;
    task.completions()
        .iter()
        .find(|c| calendar.same_period(c.completed_ts, now, period))
}

pub fn is_completed_now(
    task: &Task,
    now: i64,
    calendar: &Calendar,
) -> bool {
    match task.recurrence {
        Recurrence::Once => task.status == TaskStatus::Completed,
        _ => find_period_completion(task, now, calendar).is_some(),
    }
}

/// Decide the writes that toggle `task` at `now`.  The task must have
/// its completions loaded for recurring tasks to be evaluated correctly.
pub fn plan_toggle(
    task: &Task,
    now: i64,
    calendar: &Calendar,
    policy: UncheckPolicy,
) -> TogglePlan {
    let unchanged = TogglePlan {
        task_id: task.id,
        completed: false,
        status: task.status,
        completed_ts: task.completed_ts,
        insert: None,
        delete: None,
    };
    if let Some(period) = task.recurrence.period() {
        match find_period_completion(task, now, calendar) {
            Some(completion) => TogglePlan {
                // another completion in the same period keeps it done
                completed: task.completions()
                    .iter()
                    .any(|c| c.id != completion.id
                        && calendar.same_period(c.completed_ts, now, period)),
                delete: Some(completion.id),
                ..unchanged
            },
            None => TogglePlan {
                completed: true,
                completed_ts: Some(now),
                insert: Some(now),
                ..unchanged
            },
        }
    } else {
        match task.status.toggled() {
            TaskStatus::Completed => TogglePlan {
                completed: true,
                status: TaskStatus::Completed,
                completed_ts: Some(now),
                insert: Some(now),
                ..unchanged
            },
            TaskStatus::Pending => TogglePlan {
                status: TaskStatus::Pending,
                completed_ts: None,
                delete: match policy {
                    UncheckPolicy::Asymmetric => None,
                    UncheckPolicy::Symmetric => task.completions()
                        .iter()
                        .max_by_key(|c| (c.completed_ts, c.id))
                        .map(|c| c.id),
                },
                ..unchanged
            },
        }
    }
}

impl TogglePlan {
    /// Whether the task record itself needs to be written.
    pub fn updates_task(&self, task: &Task) -> bool {
        self.status != task.status || self.completed_ts != task.completed_ts
    }

    /// Apply the plan to an in memory task, with `inserted_id` as the id
    /// of the new completion record if one is inserted.
    pub fn apply(&self, task: &mut Task, inserted_id: i64) -> ToggleOutcome {
        let task_id = task.id;
        task.status = self.status;
        task.completed_ts = self.completed_ts;
        let completions = task.completions.get_or_insert_with(Default::default);
        let deleted = self.delete.filter(|id| {
            let before = completions.len();
            completions.retain(|c| c.id != *id);
            completions.len() != before
        });
        let inserted = self.insert.map(|completed_ts| {
            let completion = TaskCompletion {
                id: inserted_id,
                task_id,
                completed_ts,
            };
            completions.push(completion.clone());
            completion
        });
        ToggleOutcome {
            completed: self.completed,
            inserted,
            deleted,
        }
    }
}
