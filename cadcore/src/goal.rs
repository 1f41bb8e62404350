use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A long term goal; goals are not linked to tasks.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub created_ts: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Goals(Vec<Goal>);

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GoalFields {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
}

mod impls;
pub mod traits;
