use std::fmt::{
    Display,
    Formatter,
    Result,
};
use crate::task::*;

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{} - {} - {} - {} - {}{}",
            self.id,
            self.recurrence,
            self.priority,
            self.status,
            &self.title,
            self.due_date
                .map(|d| format!(" (due {d})"))
                .unwrap_or_default(),
        )
    }
}

impl Display for TaskCompletion {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{} - task {} - {}",
            self.id,
            self.task_id,
            chrono::DateTime::from_timestamp(self.completed_ts, 0)
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| self.completed_ts.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::task::*;

    #[test]
    fn task_display() {
        let task = Task {
            id: 3,
            user_id: 1,
            title: "File taxes".into(),
            description: None,
            recurrence: Recurrence::Yearly,
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 4, 30),
            status: TaskStatus::Pending,
            completed_ts: None,
            created_ts: 0,
            updated_ts: 0,
            completions: None,
        };
        assert_eq!(
            task.to_string(),
            "3 - YEARLY - HIGH - PENDING - File taxes (due 2024-04-30)",
        );
    }

    #[test]
    fn completion_display() {
        let completion = TaskCompletion {
            id: 1,
            task_id: 2,
            completed_ts: 1709287200,
        };
        assert_eq!(completion.to_string(), "1 - task 2 - 2024-03-01T10:00:00+00:00");
    }
}
