use async_trait::async_trait;
use cadcore::{
    ac::{
        traits::SessionBackend,
        session::{
            Session,
            SessionToken,
        },
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

async fn save_session_sqlite(
    backend: &SqliteBackend,
    session: &Session,
) -> Result<i64, BackendError> {
    let last_active_ts = Utc::now().timestamp();
    let token_str = session.token.to_string();
    sqlx::query(r#"
INSERT INTO user_session (
    token,
    user_id,
    origin,
    created_ts,
    last_active_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5 )
ON CONFLICT(token)
DO UPDATE SET
    origin = ?3,
    last_active_ts = ?6
"#)
        .bind(token_str)
        .bind(session.user_id)
        .bind(&session.origin)
        .bind(session.created_ts)
        .bind(session.last_active_ts)
        .bind(last_active_ts)
        .execute(&*backend.pool)
        .await?;
    Ok(last_active_ts)
}

async fn load_session_sqlite(
    backend: &SqliteBackend,
    token: SessionToken,
) -> Result<Option<Session>, BackendError> {
    let token_str = token.to_string();
    Ok(sqlx::query(r#"
SELECT
    user_id,
    origin,
    created_ts,
    last_active_ts
FROM user_session
WHERE token = ?1
"#)
        .bind(token_str)
        .try_map(|row: SqliteRow| Ok(Session {
            token,
            user_id: row.try_get("user_id")?,
            origin: row.try_get("origin")?,
            created_ts: row.try_get("created_ts")?,
            last_active_ts: row.try_get("last_active_ts")?,
        }))
        .fetch_optional(&*backend.pool)
        .await?
    )
}

async fn purge_session_sqlite(
    backend: &SqliteBackend,
    token: SessionToken,
) -> Result<(), BackendError> {
    let token_str = token.to_string();
    sqlx::query(r#"
DELETE FROM
    user_session
WHERE
    token = ?1
"#)
        .bind(token_str)
        .execute(&*backend.pool)
        .await?;
    Ok(())
}

async fn get_user_sessions_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
) -> Result<Vec<Session>, BackendError> {
    Ok(sqlx::query(r#"
SELECT
    user_id,
    origin,
    created_ts,
    last_active_ts
FROM user_session
WHERE user_id = ?1
ORDER BY last_active_ts DESC
"#)
        .bind(user_id)
        .try_map(|row: SqliteRow| Ok(Session {
            token: SessionToken::default(),
            user_id: row.try_get("user_id")?,
            origin: row.try_get("origin")?,
            created_ts: row.try_get("created_ts")?,
            last_active_ts: row.try_get("last_active_ts")?,
        }))
        .fetch_all(&*backend.pool)
        .await?
    )
}

async fn purge_user_sessions_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
    keep: Option<SessionToken>,
) -> Result<(), BackendError> {
    let mut builder = sqlx::QueryBuilder::new(r#"
DELETE FROM
    user_session
WHERE user_id = "#);
    builder.push_bind(user_id);
    if let Some(token) = keep {
        builder.push(" AND token != ");
        builder.push_bind(token.to_string());
    }
    builder.build()
        .execute(&*backend.pool)
        .await?;
    Ok(())
}

#[async_trait]
impl SessionBackend for SqliteBackend {
    async fn save_session(
        &self,
        session: &Session,
    ) -> Result<i64, BackendError> {
        save_session_sqlite(
            &self,
            session,
        ).await
    }

    async fn load_session(
        &self,
        token: SessionToken,
    ) -> Result<Option<Session>, BackendError> {
        load_session_sqlite(
            &self,
            token,
        ).await
    }

    async fn purge_session(
        &self,
        token: SessionToken,
    ) -> Result<(), BackendError> {
        purge_session_sqlite(
            &self,
            token,
        ).await
    }

    async fn get_user_sessions(
        &self,
        user_id: i64,
    ) -> Result<Vec<Session>, BackendError> {
        get_user_sessions_sqlite(
            &self,
            user_id,
        ).await
    }

    async fn purge_user_sessions(
        &self,
        user_id: i64,
        keep: Option<SessionToken>,
    ) -> Result<(), BackendError> {
        purge_user_sessions_sqlite(
            &self,
            user_id,
            keep,
        ).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use cadcore::ac::{
        session::{
            SessionFactory,
            SessionTokenFactory,
        },
        traits::SessionBackend,
    };
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };
    use test_cad::chrono::set_timestamp;

    use crate::impls::tests::{
        add_other_user,
        backend_with_user,
    };

    #[async_std::test]
    async fn test_basic() -> anyhow::Result<()> {
        let (backend, user_id) = backend_with_user().await?;
        let other_id = add_other_user(&backend).await?;
        let factory = SessionFactory::new()
            .token_factory(SessionTokenFactory::new().rng(StdRng::seed_from_u64(1)))
            .ts_source(|| 1000);

        let session = factory.create(user_id, "localhost");
        set_timestamp(1000);
        assert_eq!(SessionBackend::save_session(&backend, &session).await?, 1000);
        assert_eq!(
            SessionBackend::load_session(&backend, session.token).await?,
            Some(session.clone()),
        );

        // saving again refreshes the last active timestamp only
        set_timestamp(2000);
        assert_eq!(SessionBackend::save_session(&backend, &session).await?, 2000);
        let loaded = SessionBackend::load_session(&backend, session.token).await?
            .expect("session should exist");
        assert_eq!(loaded.created_ts, 1000);
        assert_eq!(loaded.last_active_ts, 2000);

        let second = factory.create(user_id, "remote");
        let third = factory.create(user_id, "other");
        let others = factory.create(other_id, "localhost");
        for s in [&second, &third, &others] {
            SessionBackend::save_session(&backend, s).await?;
        }
        let listed = SessionBackend::get_user_sessions(&backend, user_id).await?;
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().all(|s| s.token == Default::default()));

        SessionBackend::purge_session(&backend, third.token).await?;
        assert_eq!(SessionBackend::load_session(&backend, third.token).await?, None);

        SessionBackend::purge_user_sessions(&backend, user_id, Some(second.token)).await?;
        assert_eq!(SessionBackend::load_session(&backend, session.token).await?, None);
        assert!(SessionBackend::load_session(&backend, second.token).await?.is_some());
        assert!(SessionBackend::load_session(&backend, others.token).await?.is_some());

        SessionBackend::purge_user_sessions(&backend, user_id, None).await?;
        assert_eq!(SessionBackend::get_user_sessions(&backend, user_id).await?.len(), 0);
        assert_eq!(SessionBackend::get_user_sessions(&backend, other_id).await?.len(), 1);
        Ok(())
    }
}
