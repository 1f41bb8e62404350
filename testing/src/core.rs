use async_trait::async_trait;
use cadcore::{
    calendar::Calendar,
    completion::{
        ToggleOutcome,
        UncheckPolicy,
    },
    error::BackendError,
    goal::{
        Goal,
        GoalFields,
        Goals,
        traits::GoalBackend,
    },
    platform::{
        DefaultTrackingPlatform,
        PlatformUrl,
    },
    task::{
        Task,
        TaskCompletion,
        TaskCompletions,
        TaskFields,
        TaskQuery,
        Tasks,
        traits::{
            TaskBackend,
            TaskCompletionBackend,
        },
    },
};
use mockall::mock;

mock! {
    pub Platform {
        pub async fn task_add(
            &self,
            owner: i64,
            fields: &TaskFields,
        ) -> Result<i64, BackendError>;
        pub async fn task_get_by_id(
            &self,
            id: i64,
            owner: i64,
        ) -> Result<Option<Task>, BackendError>;
        pub async fn task_list(
            &self,
            owner: i64,
            query: &TaskQuery,
        ) -> Result<Tasks, BackendError>;
        pub async fn task_update(
            &self,
            id: i64,
            owner: i64,
            fields: &TaskFields,
        ) -> Result<bool, BackendError>;
        pub async fn task_delete(
            &self,
            id: i64,
            owner: i64,
        ) -> Result<bool, BackendError>;
        pub async fn task_toggle(
            &self,
            id: i64,
            owner: i64,
            now: i64,
            calendar: &Calendar,
            policy: UncheckPolicy,
        ) -> Result<Option<ToggleOutcome>, BackendError>;

        pub async fn completion_insert(
            &self,
            task_id: i64,
            completed_ts: i64,
        ) -> Result<TaskCompletion, BackendError>;
        pub async fn completion_delete(
            &self,
            id: i64,
        ) -> Result<bool, BackendError>;
        pub async fn completion_list_for_task(
            &self,
            task_id: i64,
        ) -> Result<TaskCompletions, BackendError>;
        pub async fn completion_list_for_user(
            &self,
            owner: i64,
            since: Option<i64>,
        ) -> Result<Vec<TaskCompletion>, BackendError>;

        pub async fn goal_add(
            &self,
            owner: i64,
            fields: &GoalFields,
        ) -> Result<i64, BackendError>;
        pub async fn goal_get_by_id(
            &self,
            id: i64,
            owner: i64,
        ) -> Result<Option<Goal>, BackendError>;
        pub async fn goal_list(
            &self,
            owner: i64,
            limit: Option<i64>,
        ) -> Result<Goals, BackendError>;
        pub async fn goal_update(
            &self,
            id: i64,
            owner: i64,
            fields: &GoalFields,
        ) -> Result<bool, BackendError>;
        pub async fn goal_delete(
            &self,
            id: i64,
            owner: i64,
        ) -> Result<bool, BackendError>;
    }
}

impl PlatformUrl for MockPlatform {
    fn url(&self) -> &str {
        "mock://"
    }
}

impl DefaultTrackingPlatform for MockPlatform {}

#[async_trait]
impl TaskBackend for MockPlatform {
    async fn add_task(
        &self,
        owner: i64,
        fields: &TaskFields,
    ) -> Result<i64, BackendError> {
        self.task_add(owner, fields).await
    }
    async fn get_task_by_id(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<Option<Task>, BackendError> {
        self.task_get_by_id(id, owner).await
    }
    async fn list_tasks(
        &self,
        owner: i64,
        query: &TaskQuery,
    ) -> Result<Tasks, BackendError> {
        self.task_list(owner, query).await
    }
    async fn update_task(
        &self,
        id: i64,
        owner: i64,
        fields: &TaskFields,
    ) -> Result<bool, BackendError> {
        self.task_update(id, owner, fields).await
    }
    async fn delete_task(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<bool, BackendError> {
        self.task_delete(id, owner).await
    }
    async fn toggle_task(
        &self,
        id: i64,
        owner: i64,
        now: i64,
        calendar: &Calendar,
        policy: UncheckPolicy,
    ) -> Result<Option<ToggleOutcome>, BackendError> {
        self.task_toggle(id, owner, now, calendar, policy).await
    }
}

#[async_trait]
impl TaskCompletionBackend for MockPlatform {
    async fn insert_completion(
        &self,
        task_id: i64,
        completed_ts: i64,
    ) -> Result<TaskCompletion, BackendError> {
        self.completion_insert(task_id, completed_ts).await
    }
    async fn delete_completion(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        self.completion_delete(id).await
    }
    async fn list_completions_for_task(
        &self,
        task_id: i64,
    ) -> Result<TaskCompletions, BackendError> {
        self.completion_list_for_task(task_id).await
    }
    async fn list_completions_for_user(
        &self,
        owner: i64,
        since: Option<i64>,
    ) -> Result<Vec<TaskCompletion>, BackendError> {
        self.completion_list_for_user(owner, since).await
    }
}

#[async_trait]
impl GoalBackend for MockPlatform {
    async fn add_goal(
        &self,
        owner: i64,
        fields: &GoalFields,
    ) -> Result<i64, BackendError> {
        self.goal_add(owner, fields).await
    }
    async fn get_goal_by_id(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<Option<Goal>, BackendError> {
        self.goal_get_by_id(id, owner).await
    }
    async fn list_goals(
        &self,
        owner: i64,
        limit: Option<i64>,
    ) -> Result<Goals, BackendError> {
        self.goal_list(owner, limit).await
    }
    async fn update_goal(
        &self,
        id: i64,
        owner: i64,
        fields: &GoalFields,
    ) -> Result<bool, BackendError> {
        self.goal_update(id, owner, fields).await
    }
    async fn delete_goal(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<bool, BackendError> {
        self.goal_delete(id, owner).await
    }
}
