use chrono::NaiveDate;
use std::ops::{
    Deref,
    DerefMut,
};

use crate::goal::*;

impl From<Vec<Goal>> for Goals {
    fn from(args: Vec<Goal>) -> Self {
        Self(args)
    }
}

impl<const N: usize> From<[Goal; N]> for Goals {
    fn from(args: [Goal; N]) -> Self {
        Self(args.into())
    }
}

impl Deref for Goals {
    type Target = Vec<Goal>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Goals {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IntoIterator for Goals {
    type Item = Goal;
    type IntoIter = std::vec::IntoIter<Goal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Goal {
    pub fn fields(&self) -> GoalFields {
        GoalFields {
            title: self.title.clone(),
            description: self.description.clone(),
            deadline: self.deadline,
        }
    }
}

impl GoalFields {
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

    pub fn deadline(mut self, val: NaiveDate) -> Self {
        self.deadline = Some(val);
        self
    }
}

#[cfg(feature = "display")]
impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, &self.title)?;
        if let Some(deadline) = self.deadline {
            write!(f, " (by {deadline})")?;
        }
        Ok(())
    }
}
