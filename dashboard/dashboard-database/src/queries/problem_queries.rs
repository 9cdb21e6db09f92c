use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ProblemQueries {
    pool: SqlitePool,
}

impl ProblemQueries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// When dashboard problems were first detected, or `None` when no
    /// problems are ongoing.
    pub async fn problems_started_at(&self) -> anyhow::Result<Option<DateTime<Utc>>> {
        let mut conn = self.pool.acquire().await?;

        let problems_started_at = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            r#"
            SELECT problems_started_at
            FROM problem_state
            WHERE id = 1
            "#,
        )
        .fetch_one(&mut *conn)
        .await?;

        Ok(problems_started_at)
    }

    /// Record that problems are being reported. Keeps the original start
    /// time if problems were already ongoing.
    pub async fn mark_problems_started(&self, now: DateTime<Utc>) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
            UPDATE problem_state
            SET problems_started_at = COALESCE(problems_started_at, ?1)
            WHERE id = 1
            "#,
        )
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn clear_problems(&self) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
            UPDATE problem_state
            SET problems_started_at = NULL
            WHERE id = 1
            "#,
        )
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
