use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashboard_database::Database;

use super::DashboardDataStore;

/// Dashboard problem state read straight from the service database.
pub struct DatabaseDashboardData {
    db: Database,
}

impl DatabaseDashboardData {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DashboardDataStore for DatabaseDashboardData {
    async fn problems_started_at(&self) -> anyhow::Result<Option<DateTime<Utc>>> {
        self.db.problem_queries.problems_started_at().await
    }
}
