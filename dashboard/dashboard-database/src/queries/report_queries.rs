use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct DashboardReport {
    pub report_key: String,
    pub payload_json: String,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ReportQueries {
    pool: SqlitePool,
}

impl ReportQueries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Recompute the snapshot for one report and store it. Counts the
    /// report's activity events over the rolling 24 hour, 7 day and 30 day
    /// windows ending at `now`.
    pub async fn refresh_report(
        &self,
        report_key: &str,
        event_types: &[&str],
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;

        // ?1..?3 are the window cutoffs, the event types follow
        let placeholders = (0..event_types.len())
            .map(|i| format!("?{}", i + 4))
            .collect::<Vec<_>>()
            .join(", ");

        let count_sql = format!(
            r#"
            SELECT
                COALESCE(SUM(created_at > ?1), 0) AS last_24_hours,
                COALESCE(SUM(created_at > ?2), 0) AS last_7_days,
                COUNT(*) AS last_30_days
            FROM activity_events
            WHERE created_at > ?3
              AND event_type IN ({placeholders})
            "#
        );

        let mut counts = sqlx::query_as::<_, (i64, i64, i64)>(&count_sql)
            .bind(now - Duration::hours(24))
            .bind(now - Duration::days(7))
            .bind(now - Duration::days(30));

        for event_type in event_types {
            counts = counts.bind(*event_type);
        }

        let (last_24_hours, last_7_days, last_30_days) = counts.fetch_one(&mut *conn).await?;

        let payload_json = serde_json::json!({
            "last_24_hours": last_24_hours,
            "last_7_days": last_7_days,
            "last_30_days": last_30_days,
        })
        .to_string();

        sqlx::query(
            r#"
            INSERT INTO dashboard_reports (report_key, payload_json, refreshed_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (report_key) DO UPDATE SET
                payload_json = excluded.payload_json,
                refreshed_at = excluded.refreshed_at
            "#,
        )
        .bind(report_key)
        .bind(payload_json)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn report(&self, report_key: &str) -> anyhow::Result<Option<DashboardReport>> {
        let mut conn = self.pool.acquire().await?;

        let report = sqlx::query_as::<_, DashboardReport>(
            r#"
            SELECT report_key, payload_json, refreshed_at
            FROM dashboard_reports
            WHERE report_key = ?1
            "#,
        )
        .bind(report_key)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(report)
    }
}
