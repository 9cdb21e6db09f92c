use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::queries::{
    activity_event_queries::ActivityEventQueries, group_message_queries::GroupMessageQueries,
    group_queries::GroupQueries, problem_queries::ProblemQueries, report_queries::ReportQueries,
};

#[derive(Clone)]
pub struct Database {
    pub problem_queries: ProblemQueries,
    pub group_queries: GroupQueries,
    pub group_message_queries: GroupMessageQueries,
    pub report_queries: ReportQueries,
    pub activity_event_queries: ActivityEventQueries,
}

impl Database {
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Database> {
        let path = path.as_ref();
        tracing::info!("Opening DB: {}", path.display());

        let connect_options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_options)
            .await?;

        tracing::info!("Migrating DB: {}", path.display());
        sqlx::migrate!().run(&pool).await?;

        Ok(Database {
            problem_queries: ProblemQueries::new(pool.clone()),
            group_queries: GroupQueries::new(pool.clone()),
            group_message_queries: GroupMessageQueries::new(pool.clone()),
            report_queries: ReportQueries::new(pool.clone()),
            activity_event_queries: ActivityEventQueries::new(pool),
        })
    }
}
