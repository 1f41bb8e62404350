//! Read only aggregations over tasks and their completion history.

use chrono::{
    Datelike,
    Months,
    NaiveDate,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    calendar::Calendar,
    completion::is_completed_now,
    task::{
        Recurrence,
        Task,
        TaskCompletion,
        TaskStatus,
    },
};

/// Density bucket of a single day in the contribution view.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Intensity {
    Empty,
    Low,
    LowMedium,
    Medium,
    High,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub count: usize,
    pub intensity: Intensity,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct MonthTrend {
    pub year: i32,
    pub month: u32,
    pub counts: BTreeMap<Recurrence, usize>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percentage of completed tasks.
    pub completion_rate: u32,
}

impl Intensity {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Intensity::Empty,
            1 => Intensity::Low,
            2 => Intensity::LowMedium,
            3 => Intensity::Medium,
            _ => Intensity::High,
        }
    }
}

/// One entry for every day of `year`, counting the completions whose
/// local date falls on that day.
pub fn contribution<'a>(
    completions: impl IntoIterator<Item = &'a TaskCompletion>,
    year: i32,
    calendar: &Calendar,
) -> Vec<DayActivity> {
    let counts = completions.into_iter()
        .map(|c| calendar.date(c.completed_ts))
        .filter(|date| date.year() == year)
        .counts();
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Vec::new();
    };
    start.iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            DayActivity {
                date,
                count,
                intensity: Intensity::from_count(count),
            }
        })
        .collect()
}

/// Completion counts per recurrence for the twelve calendar months
/// ending with the month of `now`, oldest first.  Every recurrence
/// present among `tasks` gets an entry in every month, zero included.
pub fn monthly_trend(
    tasks: &[Task],
    now: i64,
    calendar: &Calendar,
) -> Vec<MonthTrend> {
    let present = tasks.iter()
        .map(|t| t.recurrence)
        .unique()
        .collect::<Vec<_>>();
    let counts = tasks.iter()
        .flat_map(|t| t.completions()
            .iter()
            .map(move |c| {
                let date = calendar.date(c.completed_ts);
                (date.year(), date.month(), t.recurrence)
            })
        )
        .counts();
    let today = calendar.date(now);
    let Some(this_month) = today.with_day(1) else {
        return Vec::new();
    };
    (0..12u32).rev()
        .filter_map(|back| this_month.checked_sub_months(Months::new(back)))
        .map(|month| MonthTrend {
            year: month.year(),
            month: month.month(),
            counts: present.iter()
                .map(|r| (
                    *r,
                    counts.get(&(month.year(), month.month(), *r))
                        .copied()
                        .unwrap_or(0),
                ))
                .collect(),
        })
        .collect()
}

impl Summary {
    /// Counts by stored status, as shown on the dashboard.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        let completion_rate = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }
}

/// The tasks shown for a given day: every daily task, plus the tasks
/// due on that day.
pub fn agenda(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter()
        .filter(|t| t.recurrence == Recurrence::Daily || t.due_date == Some(date))
        .collect()
}

/// Keep only the tasks whose effective completion for `now` matches
/// `completed`.
pub fn filter_by_completion<'a>(
    tasks: &'a [Task],
    completed: bool,
    now: i64,
    calendar: &Calendar,
) -> Vec<&'a Task> {
    tasks.iter()
        .filter(|t| is_completed_now(t, now, calendar) == completed)
        .collect()
}
