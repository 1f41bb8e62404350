use async_trait::async_trait;
use cadcore::{
    error::BackendError,
    goal::{
        Goal,
        GoalFields,
        Goals,
        traits::GoalBackend,
    },
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
    impls::{
        decode_date,
        encode_date,
    },
};

fn goal_from_row(row: SqliteRow) -> Result<Goal, sqlx::Error> {
    Ok(Goal {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        deadline: decode_date(row.try_get("deadline")?)?,
        created_ts: row.try_get("created_ts")?,
    })
}

async fn add_goal_sqlite(
    backend: &SqliteBackend,
    owner: i64,
    fields: &GoalFields,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(r#"
INSERT INTO goal (
    user_id,
    title,
    description,
    deadline,
    created_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5 )
"#)
        .bind(owner)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(encode_date(fields.deadline))
        .bind(ts)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn get_goal_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
    owner: i64,
) -> Result<Option<Goal>, BackendError> {
    let goal = sqlx::query(r#"
SELECT
    id,
    user_id,
    title,
    description,
    deadline,
    created_ts
FROM
    goal
WHERE
    id = ?1
    AND user_id = ?2
"#)
        .bind(id)
        .bind(owner)
        .try_map(goal_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(goal)
}

async fn list_goals_sqlite(
    backend: &SqliteBackend,
    owner: i64,
    limit: Option<i64>,
) -> Result<Goals, BackendError> {
    // a negative limit means no limit in sqlite
    let goals = sqlx::query(r#"
SELECT
    id,
    user_id,
    title,
    description,
    deadline,
    created_ts
FROM
    goal
WHERE
    user_id = ?1
ORDER BY created_ts DESC, id DESC
LIMIT ?2
"#)
        .bind(owner)
        .bind(limit.unwrap_or(-1))
        .try_map(goal_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(goals.into())
}

async fn update_goal_sqlite(
    backend: &SqliteBackend,
    id: i64,
    owner: i64,
    fields: &GoalFields,
) -> Result<bool, BackendError> {
    let result = sqlx::query(r#"
UPDATE
    goal
SET
    title = ?3,
    description = ?4,
    deadline = ?5
WHERE
    id = ?1
    AND user_id = ?2
"#)
        .bind(id)
        .bind(owner)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(encode_date(fields.deadline))
        .execute(&*backend.pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_goal_sqlite(
    backend: &SqliteBackend,
    id: i64,
    owner: i64,
) -> Result<bool, BackendError> {
    let result = sqlx::query(r#"
DELETE FROM
    goal
WHERE
    id = ?1
    AND user_id = ?2
"#)
        .bind(id)
        .bind(owner)
        .execute(&*backend.pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl GoalBackend for SqliteBackend {
    async fn add_goal(
        &self,
        owner: i64,
        fields: &GoalFields,
    ) -> Result<i64, BackendError> {
        add_goal_sqlite(
            &self,
            owner,
            fields,
        ).await
    }

    async fn get_goal_by_id(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<Option<Goal>, BackendError> {
        get_goal_by_id_sqlite(
            &self,
            id,
            owner,
        ).await
    }

    async fn list_goals(
        &self,
        owner: i64,
        limit: Option<i64>,
    ) -> Result<Goals, BackendError> {
        list_goals_sqlite(
            &self,
            owner,
            limit,
        ).await
    }

    async fn update_goal(
        &self,
        id: i64,
        owner: i64,
        fields: &GoalFields,
    ) -> Result<bool, BackendError> {
        update_goal_sqlite(
            &self,
            id,
            owner,
            fields,
        ).await
    }

    async fn delete_goal(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<bool, BackendError> {
        delete_goal_sqlite(
            &self,
            id,
            owner,
        ).await
    }
}
