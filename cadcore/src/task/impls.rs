use chrono::NaiveDate;
use std::{
    fmt,
    ops::{
        Deref,
        DerefMut,
    },
    str::FromStr,
};

use crate::{
    calendar::Period,
    error::ValueError,
    task::*,
};

impl Recurrence {
    pub const ALL: [Recurrence; 5] = [
        Recurrence::Once,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
        Recurrence::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Once => "ONCE",
            Recurrence::Daily => "DAILY",
            Recurrence::Weekly => "WEEKLY",
            Recurrence::Monthly => "MONTHLY",
            Recurrence::Yearly => "YEARLY",
        }
    }

    /// The calendar period a completion counts for, `None` for tasks
    /// that are done once.
    pub fn period(&self) -> Option<Period> {
        match self {
            Recurrence::Once => None,
            Recurrence::Daily => Some(Period::Day),
            Recurrence::Weekly => Some(Period::Week),
            Recurrence::Monthly => Some(Period::Month),
            Recurrence::Yearly => Some(Period::Year),
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.period().is_some()
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl FromStr for Recurrence {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ONCE" => Ok(Recurrence::Once),
            "DAILY" => Ok(Recurrence::Daily),
            "WEEKLY" => Ok(Recurrence::Weekly),
            "MONTHLY" => Ok(Recurrence::Monthly),
            "YEARLY" => Ok(Recurrence::Yearly),
            _ => Err(ValueError::Unsupported(format!("{s:?} is not a task category"))),
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl FromStr for Priority {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            "URGENT" => Ok(Priority::Urgent),
            _ => Err(ValueError::Unsupported(format!("{s:?} is not a priority"))),
        }
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl FromStr for TaskStatus {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "COMPLETED" => Ok(TaskStatus::Completed),
            _ => Err(ValueError::Unsupported(format!("{s:?} is not a task status"))),
        }
    }
}

impl TaskOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TaskOrder::CreatedAsc => "ASC",
            TaskOrder::CreatedDesc => "DESC",
        }
    }
}

/// Parse a calendar date as written on the command line, `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValueError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValueError::InvalidDate(s.to_string()))
}

impl From<Vec<TaskCompletion>> for TaskCompletions {
    fn from(args: Vec<TaskCompletion>) -> Self {
        Self(args)
    }
}

impl<const N: usize> From<[TaskCompletion; N]> for TaskCompletions {
    fn from(args: [TaskCompletion; N]) -> Self {
        Self(args.into())
    }
}

impl Deref for TaskCompletions {
    type Target = Vec<TaskCompletion>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TaskCompletions {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Task>> for Tasks {
    fn from(args: Vec<Task>) -> Self {
        Self(args)
    }
}

impl Deref for Tasks {
    type Target = Vec<Task>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Tasks {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IntoIterator for Tasks {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    /// The loaded completions, empty if they were never loaded.
    pub fn completions(&self) -> &[TaskCompletion] {
        self.completions
            .as_deref()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            recurrence: self.recurrence,
            priority: self.priority,
            due_date: self.due_date,
        }
    }
}

impl TaskFields {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, val: impl Into<String>) -> Self {
        self.description = Some(val.into());
        self
    }

    pub fn recurrence(mut self, val: Recurrence) -> Self {
        self.recurrence = val;
        self
    }

    pub fn priority(mut self, val: Priority) -> Self {
        self.priority = val;
        self
    }

    pub fn due_date(mut self, val: NaiveDate) -> Self {
        self.due_date = Some(val);
        self
    }
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, val: TaskStatus) -> Self {
        self.status = Some(val);
        self
    }

    pub fn recurrence(mut self, val: Recurrence) -> Self {
        self.recurrence = Some(val);
        self
    }

    pub fn order(mut self, val: TaskOrder) -> Self {
        self.order = val;
        self
    }

    pub fn limit(mut self, val: i64) -> Self {
        self.limit = Some(val);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence_tags() -> anyhow::Result<()> {
        for recurrence in Recurrence::ALL {
            assert_eq!(recurrence.as_str().parse::<Recurrence>()?, recurrence);
        }
        assert_eq!("daily".parse::<Recurrence>()?, Recurrence::Daily);
        assert_eq!(" Weekly ".parse::<Recurrence>()?, Recurrence::Weekly);
        assert!(matches!(
            "DAYLY".parse::<Recurrence>(),
            Err(ValueError::Unsupported(_)),
        ));
        assert!(!Recurrence::Once.is_recurring());
        assert_eq!(Recurrence::Weekly.period(), Some(Period::Week));
        Ok(())
    }

    #[test]
    fn status_toggles() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Pending.toggled().toggled(), TaskStatus::Pending);
    }

    #[test]
    fn dates() -> anyhow::Result<()> {
        assert_eq!(
            parse_date("2024-03-01")?,
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        );
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("tomorrow").is_err());
        Ok(())
    }

    #[test]
    fn serde_tags() -> anyhow::Result<()> {
        let fields = TaskFields::new("Stretch")
            .recurrence(Recurrence::Daily)
            .priority(Priority::Urgent)
            .due_date(parse_date("2024-04-30")?);
        let value = serde_json::to_value(&fields)?;
        assert_eq!(value["recurrence"], "DAILY");
        assert_eq!(value["priority"], "URGENT");
        assert_eq!(value["due_date"], "2024-04-30");
        assert_eq!(serde_json::from_value::<TaskFields>(value)?, fields);
        Ok(())
    }
}
