use async_trait::async_trait;

use crate::{
    error::BackendError,
    goal::{
        Goal,
        GoalFields,
        Goals,
    },
};

#[async_trait]
pub trait GoalBackend {
    async fn add_goal(
        &self,
        owner: i64,
        fields: &GoalFields,
    ) -> Result<i64, BackendError>;
    async fn get_goal_by_id(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<Option<Goal>, BackendError>;
    /// Newest first.
    async fn list_goals(
        &self,
        owner: i64,
        limit: Option<i64>,
    ) -> Result<Goals, BackendError>;
    async fn update_goal(
        &self,
        id: i64,
        owner: i64,
        fields: &GoalFields,
    ) -> Result<bool, BackendError>;
    async fn delete_goal(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<bool, BackendError>;
}
