use async_trait::async_trait;
use cadcore::{
    error::BackendError,
    task::{
        TaskCompletion,
        TaskCompletions,
        traits::TaskCompletionBackend,
    },
};
use sqlx::{
    Row,
    SqliteExecutor,
    sqlite::SqliteRow,
};

use crate::SqliteBackend;

fn completion_from_row(row: SqliteRow) -> Result<TaskCompletion, sqlx::Error> {
    Ok(TaskCompletion {
        id: row.try_get("id")?,
        task_id: row.try_get("task_id")?,
        completed_ts: row.try_get("completed_ts")?,
    })
}

pub(crate) async fn insert_completion_sqlite<'c>(
    executor: impl SqliteExecutor<'c>,
    task_id: i64,
    completed_ts: i64,
) -> Result<TaskCompletion, sqlx::Error> {
    let id = sqlx::query(r#"
INSERT INTO task_completion (
    task_id,
    completed_ts
)
VALUES ( ?1, ?2 )
"#)
        .bind(task_id)
        .bind(completed_ts)
        .execute(executor)
        .await?
        .last_insert_rowid();
    Ok(TaskCompletion {
        id,
        task_id,
        completed_ts,
    })
}

pub(crate) async fn delete_completion_sqlite<'c>(
    executor: impl SqliteExecutor<'c>,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"
DELETE FROM
    task_completion
WHERE
    id = ?1
"#)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_completions_for_task_sqlite<'c>(
    executor: impl SqliteExecutor<'c>,
    task_id: i64,
) -> Result<Vec<TaskCompletion>, sqlx::Error> {
    sqlx::query(r#"
SELECT
    id,
    task_id,
    completed_ts
FROM
    task_completion
WHERE
    task_id = ?1
ORDER BY completed_ts, id
"#)
        .bind(task_id)
        .try_map(completion_from_row)
        .fetch_all(executor)
        .await
}

pub(crate) async fn list_completions_for_user_sqlite<'c>(
    executor: impl SqliteExecutor<'c>,
    owner: i64,
    since: Option<i64>,
) -> Result<Vec<TaskCompletion>, sqlx::Error> {
    sqlx::query(r#"
SELECT
    task_completion.id AS id,
    task_completion.task_id AS task_id,
    task_completion.completed_ts AS completed_ts
FROM
    task_completion
JOIN task ON task_completion.task_id = task.id
WHERE
    task.user_id = ?1
    AND (?2 IS NULL OR task_completion.completed_ts >= ?2)
ORDER BY task_completion.completed_ts, task_completion.id
"#)
        .bind(owner)
        .bind(since)
        .try_map(completion_from_row)
        .fetch_all(executor)
        .await
}

#[async_trait]
impl TaskCompletionBackend for SqliteBackend {
    async fn insert_completion(
        &self,
        task_id: i64,
        completed_ts: i64,
    ) -> Result<TaskCompletion, BackendError> {
        Ok(insert_completion_sqlite(
            &*self.pool,
            task_id,
            completed_ts,
        ).await?)
    }

    async fn delete_completion(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        Ok(delete_completion_sqlite(
            &*self.pool,
            id,
        ).await?)
    }

    async fn list_completions_for_task(
        &self,
        task_id: i64,
    ) -> Result<TaskCompletions, BackendError> {
        Ok(list_completions_for_task_sqlite(
            &*self.pool,
            task_id,
        ).await?.into())
    }

    async fn list_completions_for_user(
        &self,
        owner: i64,
        since: Option<i64>,
    ) -> Result<Vec<TaskCompletion>, BackendError> {
        Ok(list_completions_for_user_sqlite(
            &*self.pool,
            owner,
            since,
        ).await?)
    }
}
