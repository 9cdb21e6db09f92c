use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ActivityEventQueries {
    pool: SqlitePool,
}

impl ActivityEventQueries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record_event(
        &self,
        event_type: &str,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
            INSERT INTO activity_events (event_type, created_at)
            VALUES (?1, ?2)
            "#,
        )
        .bind(event_type)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
