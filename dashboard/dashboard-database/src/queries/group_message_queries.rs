use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct GroupMessage {
    pub group_name: String,
    pub message_kind: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct GroupMessageQueries {
    pool: SqlitePool,
}

impl GroupMessageQueries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a group message unless one of the same kind was already sent
    /// to the group within `dedup_window`. The guard and the insert are a
    /// single statement so two racing callers cannot both record a send.
    ///
    /// Returns whether a message was created.
    pub async fn create_unless_recent(
        &self,
        group_name: &str,
        message_kind: &str,
        dedup_window: Duration,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let mut conn = self.pool.acquire().await?;

        let sent_after = now - dedup_window;

        let result = sqlx::query(
            r#"
            INSERT INTO group_messages (group_name, message_kind, sent_at)
            SELECT ?1, ?2, ?3
            WHERE NOT EXISTS (
                SELECT 1
                FROM group_messages
                WHERE group_name = ?1
                  AND message_kind = ?2
                  AND sent_at > ?4
            )
            "#,
        )
        .bind(group_name)
        .bind(message_kind)
        .bind(now)
        .bind(sent_after)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn latest_message(
        &self,
        group_name: &str,
        message_kind: &str,
    ) -> anyhow::Result<Option<GroupMessage>> {
        let mut conn = self.pool.acquire().await?;

        let message = sqlx::query_as::<_, GroupMessage>(
            r#"
            SELECT group_name, message_kind, sent_at
            FROM group_messages
            WHERE group_name = ?1
              AND message_kind = ?2
            ORDER BY sent_at DESC
            LIMIT 1
            "#,
        )
        .bind(group_name)
        .bind(message_kind)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(message)
    }

    pub async fn message_count(
        &self,
        group_name: &str,
        message_kind: &str,
    ) -> anyhow::Result<i64> {
        let mut conn = self.pool.acquire().await?;

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM group_messages
            WHERE group_name = ?1
              AND message_kind = ?2
            "#,
        )
        .bind(group_name)
        .bind(message_kind)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count)
    }
}
