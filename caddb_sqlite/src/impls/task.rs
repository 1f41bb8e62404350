use async_trait::async_trait;
use cadcore::{
    calendar::Calendar,
    completion::{
        plan_toggle,
        ToggleOutcome,
        UncheckPolicy,
    },
    error::BackendError,
    task::{
        Task,
        TaskFields,
        TaskQuery,
        Tasks,
        traits::TaskBackend,
    },
};
use itertools::Itertools;
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    SqliteExecutor,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
    impls::{
        decode_date,
        decode_tag,
        encode_date,
        task_completion::{
            delete_completion_sqlite,
            insert_completion_sqlite,
            list_completions_for_task_sqlite,
            list_completions_for_user_sqlite,
        },
    },
};

fn task_from_row(row: SqliteRow) -> Result<Task, sqlx::Error> {
    Ok(Task {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        recurrence: decode_tag(row.try_get("recurrence")?)?,
        priority: decode_tag(row.try_get("priority")?)?,
        due_date: decode_date(row.try_get("due_date")?)?,
        status: decode_tag(row.try_get("status")?)?,
        completed_ts: row.try_get("completed_ts")?,
        created_ts: row.try_get("created_ts")?,
        updated_ts: row.try_get("updated_ts")?,
        completions: None,
    })
}

async fn fetch_task<'c>(
    executor: impl SqliteExecutor<'c>,
    id: i64,
    owner: i64,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query(r#"
SELECT
    id,
    user_id,
    title,
    description,
    recurrence,
    priority,
    due_date,
    status,
    completed_ts,
    created_ts,
    updated_ts
FROM
    task
WHERE
    id = ?1
    AND user_id = ?2
"#)
        .bind(id)
        .bind(owner)
        .try_map(task_from_row)
        .fetch_optional(executor)
        .await
}

async fn add_task_sqlite(
    backend: &SqliteBackend,
    owner: i64,
    fields: &TaskFields,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(r#"
INSERT INTO task (
    user_id,
    title,
    description,
    recurrence,
    priority,
    due_date,
    status,
    created_ts,
    updated_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, 'PENDING', ?7, ?7 )
"#)
        .bind(owner)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.recurrence.as_str())
        .bind(fields.priority.as_str())
        .bind(encode_date(fields.due_date))
        .bind(ts)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn get_task_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
    owner: i64,
) -> Result<Option<Task>, BackendError> {
    let mut conn = backend.pool.acquire().await?;
    let Some(mut task) = fetch_task(&mut *conn, id, owner).await? else {
        return Ok(None);
    };
    task.completions = Some(list_completions_for_task_sqlite(&mut *conn, id).await?.into());
    Ok(Some(task))
}

async fn list_tasks_sqlite(
    backend: &SqliteBackend,
    owner: i64,
    query: &TaskQuery,
) -> Result<Tasks, BackendError> {
    let mut builder = QueryBuilder::<Sqlite>::new(r#"
SELECT
    id,
    user_id,
    title,
    description,
    recurrence,
    priority,
    due_date,
    status,
    completed_ts,
    created_ts,
    updated_ts
FROM
    task
WHERE
    user_id = "#);
    builder.push_bind(owner);
    if let Some(status) = query.status {
        builder.push(" AND status = ");
        builder.push_bind(status.as_str());
    }
    if let Some(recurrence) = query.recurrence {
        builder.push(" AND recurrence = ");
        builder.push_bind(recurrence.as_str());
    }
    builder.push(format!(
        " ORDER BY created_ts {0}, id {0}",
        query.order.as_sql(),
    ));
    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }

    let mut conn = backend.pool.acquire().await?;
    let mut tasks = builder.build()
        .try_map(task_from_row)
        .fetch_all(&mut *conn)
        .await?;
    let mut completions = list_completions_for_user_sqlite(&mut *conn, owner, None)
        .await?
        .into_iter()
        .into_group_map_by(|c| c.task_id);
    for task in tasks.iter_mut() {
        task.completions = Some(completions.remove(&task.id)
            .unwrap_or_default()
            .into());
    }
    Ok(tasks.into())
}

async fn update_task_sqlite(
    backend: &SqliteBackend,
    id: i64,
    owner: i64,
    fields: &TaskFields,
) -> Result<bool, BackendError> {
    let ts = Utc::now().timestamp();
    let result = sqlx::query(r#"
UPDATE
    task
SET
    title = ?3,
    description = ?4,
    recurrence = ?5,
    priority = ?6,
    due_date = ?7,
    updated_ts = ?8
WHERE
    id = ?1
    AND user_id = ?2
"#)
        .bind(id)
        .bind(owner)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.recurrence.as_str())
        .bind(fields.priority.as_str())
        .bind(encode_date(fields.due_date))
        .bind(ts)
        .execute(&*backend.pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_task_sqlite(
    backend: &SqliteBackend,
    id: i64,
    owner: i64,
) -> Result<bool, BackendError> {
    let mut tx = backend.pool.begin().await?;
    let completions = sqlx::query(r#"
DELETE FROM
    task_completion
WHERE
    task_id IN (
        SELECT id FROM task WHERE id = ?1 AND user_id = ?2
    )
"#)
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let deleted = sqlx::query(r#"
DELETE FROM
    task
WHERE
    id = ?1
    AND user_id = ?2
"#)
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?
        .rows_affected() > 0;
    tx.commit().await?;
    if deleted {
        log::debug!("deleted task {id} along with {completions} completion(s)");
    }
    Ok(deleted)
}

async fn toggle_task_sqlite(
    backend: &SqliteBackend,
    id: i64,
    owner: i64,
    now: i64,
    calendar: &Calendar,
    policy: UncheckPolicy,
) -> Result<Option<ToggleOutcome>, BackendError> {
    // take the write lock up front so a concurrent toggle waits on it
    // rather than failing to upgrade its read
    let mut tx = backend.pool.begin_with("BEGIN IMMEDIATE").await?;
    let Some(mut task) = fetch_task(&mut *tx, id, owner).await? else {
        return Ok(None);
    };
    task.completions = Some(list_completions_for_task_sqlite(&mut *tx, id).await?.into());

    let plan = plan_toggle(&task, now, calendar, policy);
    log::trace!("toggle plan for task {id}: {plan:?}");

    let deleted = match plan.delete {
        Some(completion_id) => delete_completion_sqlite(&mut *tx, completion_id)
            .await?
            .then_some(completion_id),
        None => None,
    };
    let inserted = match plan.insert {
        Some(completed_ts) => Some(insert_completion_sqlite(&mut *tx, id, completed_ts).await?),
        None => None,
    };
    if plan.updates_task(&task) {
        sqlx::query(r#"
UPDATE
    task
SET
    status = ?2,
    completed_ts = ?3,
    updated_ts = ?4
WHERE
    id = ?1
"#)
            .bind(id)
            .bind(plan.status.as_str())
            .bind(plan.completed_ts)
            .bind(now)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(Some(ToggleOutcome {
        completed: plan.completed,
        inserted,
        deleted,
    }))
}

#[async_trait]
impl TaskBackend for SqliteBackend {
    async fn add_task(
        &self,
        owner: i64,
        fields: &TaskFields,
    ) -> Result<i64, BackendError> {
        add_task_sqlite(
            &self,
            owner,
            fields,
        ).await
    }

    async fn get_task_by_id(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<Option<Task>, BackendError> {
        get_task_by_id_sqlite(
            &self,
            id,
            owner,
        ).await
    }

    async fn list_tasks(
        &self,
        owner: i64,
        query: &TaskQuery,
    ) -> Result<Tasks, BackendError> {
        list_tasks_sqlite(
            &self,
            owner,
            query,
        ).await
    }

    async fn update_task(
        &self,
        id: i64,
        owner: i64,
        fields: &TaskFields,
    ) -> Result<bool, BackendError> {
        update_task_sqlite(
            &self,
            id,
            owner,
            fields,
        ).await
    }

    async fn delete_task(
        &self,
        id: i64,
        owner: i64,
    ) -> Result<bool, BackendError> {
        delete_task_sqlite(
            &self,
            id,
            owner,
        ).await
    }

    async fn toggle_task(
        &self,
        id: i64,
        owner: i64,
        now: i64,
        calendar: &Calendar,
        policy: UncheckPolicy,
    ) -> Result<Option<ToggleOutcome>, BackendError> {
        toggle_task_sqlite(
            &self,
            id,
            owner,
            now,
            calendar,
            policy,
        ).await
    }
}
