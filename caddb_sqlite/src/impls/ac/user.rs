use async_trait::async_trait;
use cadcore::{
    ac::{
        traits::UserBackend,
        user::User,
    },
    error::BackendError,
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

fn user_from_row(row: SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        created_ts: row.try_get("created_ts")?,
    })
}

async fn add_first_user_sqlite(
    backend: &SqliteBackend,
    email: &str,
    name: &str,
    password: &str,
) -> Result<Option<i64>, BackendError> {
    let ts = Utc::now().timestamp();
    let mut tx = backend.pool.begin().await?;
    let result = sqlx::query(r#"
INSERT INTO 'user' (
    email,
    name,
    created_ts
)
SELECT ?1, ?2, ?3
WHERE NOT EXISTS (SELECT 1 FROM 'user')
"#)
        .bind(email)
        .bind(name)
        .bind(ts)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    let id = result.last_insert_rowid();
    sqlx::query(r#"
INSERT INTO user_password (
    user_id,
    password,
    created_ts
)
VALUES ( ?1, ?2, ?3 )
"#)
        .bind(id)
        .bind(password)
        .bind(ts)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(Some(id))
}

async fn count_users_sqlite(
    backend: &SqliteBackend,
) -> Result<i64, BackendError> {
    let count = sqlx::query(r#"
SELECT
    COUNT(*) AS count
FROM
    'user'
"#)
        .try_map(|row: SqliteRow| row.try_get::<i64, _>("count"))
        .fetch_one(&*backend.pool)
        .await?;
    Ok(count)
}

async fn get_user_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<User>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    email,
    name,
    created_ts
FROM
    'user'
WHERE
    id = ?1
"#)
        .bind(id)
        .try_map(user_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(recs)
}

async fn get_user_by_email_sqlite(
    backend: &SqliteBackend,
    email: &str,
) -> Result<Option<User>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    email,
    name,
    created_ts
FROM
    'user'
WHERE
    email = ?1
"#)
        .bind(email)
        .try_map(user_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(recs)
}

async fn store_user_password_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
    password: &str,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(r#"
INSERT INTO user_password (
    user_id,
    password,
    created_ts
)
VALUES ( ?1, ?2, ?3 )
"#)
        .bind(user_id)
        .bind(password)
        .bind(ts)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn get_user_password_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
) -> Result<String, BackendError> {
    let result = sqlx::query(r#"
SELECT
    password
FROM
    user_password
WHERE
    user_id = ?1
ORDER BY id DESC
"#)
        .bind(user_id)
        .try_map(|row: SqliteRow| row.try_get::<String, _>("password"))
        .fetch_one(&*backend.pool)
        .await?;
    Ok(result)
}

async fn purge_user_passwords_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
) -> Result<(), BackendError> {
    sqlx::query(r#"
DELETE FROM
    user_password
WHERE
    user_id = ?1
"#)
        .bind(user_id)
        .execute(&*backend.pool)
        .await?;
    Ok(())
}

#[async_trait]
impl UserBackend for SqliteBackend {
    async fn add_first_user(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Option<i64>, BackendError> {
        add_first_user_sqlite(
            &self,
            email,
            name,
            password,
        ).await
    }

    async fn count_users(
        &self,
    ) -> Result<i64, BackendError> {
        count_users_sqlite(&self).await
    }

    async fn get_user_by_id(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError> {
        get_user_by_id_sqlite(
            &self,
            id,
        ).await
    }

    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, BackendError> {
        get_user_by_email_sqlite(
            &self,
            email,
        ).await
    }

    async fn get_user_password(
        &self,
        user_id: i64,
    ) -> Result<String, BackendError> {
        get_user_password_sqlite(
            &self,
            user_id,
        ).await
    }

    async fn store_user_password(
        &self,
        user_id: i64,
        password: &str,
    ) -> Result<i64, BackendError> {
        store_user_password_sqlite(
            &self,
            user_id,
            password,
        ).await
    }

    async fn purge_user_passwords(
        &self,
        user_id: i64,
    ) -> Result<(), BackendError> {
        purge_user_passwords_sqlite(
            &self,
            user_id,
        ).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use cadcore::ac::{
        traits::UserBackend,
        user::User,
    };
    use crate::SqliteBackend;
    use test_cad::chrono::set_timestamp;

    #[async_std::test]
    async fn test_basic() -> anyhow::Result<()> {
        let backend = SqliteBackend::connect("sqlite::memory:".into())
            .await?
            .migrate()
            .await?;
        assert_eq!(UserBackend::count_users(&backend).await?, 0);
        let user_id = UserBackend::add_first_user(
            &backend,
            "admin@example.com",
            "Admin",
            "password0",
        ).await?
            .expect("first user should be added");
        assert_eq!(UserBackend::count_users(&backend).await?, 1);
        let user = UserBackend::get_user_by_id(&backend, user_id).await?
            .expect("user is missing?");
        assert_eq!(
            user,
            User {
                id: 1,
                email: "admin@example.com".to_string(),
                name: "Admin".to_string(),
                created_ts: 1234567890,
            },
        );
        assert_eq!(
            UserBackend::get_user_by_email(&backend, "admin@example.com").await?,
            Some(user),
        );
        assert_eq!(
            UserBackend::get_user_by_email(&backend, "nobody@example.com").await?,
            None,
        );
        assert_eq!(UserBackend::get_user_password(&backend, user_id).await?, "password0");

        // only ever storage and retrieval of the already hashed values
        set_timestamp(0);
        UserBackend::store_user_password(&backend, user_id, "password1").await?;
        set_timestamp(1234567899);
        UserBackend::store_user_password(&backend, user_id, "password2").await?;
        assert_eq!(UserBackend::get_user_password(&backend, user_id).await?, "password2");

        UserBackend::purge_user_passwords(&backend, user_id).await?;
        assert!(UserBackend::get_user_password(&backend, user_id).await.is_err());

        UserBackend::store_user_password(&backend, user_id, "password3").await?;
        assert_eq!(UserBackend::get_user_password(&backend, user_id).await?, "password3");

        Ok(())
    }

    #[async_std::test]
    async fn only_first_user() -> anyhow::Result<()> {
        let backend = SqliteBackend::connect("sqlite::memory:".into())
            .await?
            .migrate()
            .await?;
        assert!(UserBackend::add_first_user(&backend, "a@example.com", "A", "x")
            .await?
            .is_some());
        assert_eq!(
            UserBackend::add_first_user(&backend, "b@example.com", "B", "y").await?,
            None,
        );
        assert_eq!(UserBackend::count_users(&backend).await?, 1);
        assert_eq!(UserBackend::get_user_by_email(&backend, "b@example.com").await?, None);
        Ok(())
    }
}
