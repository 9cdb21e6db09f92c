use std::{env, sync::Arc};

use chrono::Duration;
use clap::Parser;
use dashboard::{
    cli::Cli,
    services::{
        CachedStatsReport, DatabaseDashboardData, DatabaseGroupMessenger, ReportSection,
        StatsReport,
    },
    task::TaskRunner,
    tasks::DashboardStatsTask,
};
use dashboard_database::Database;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info")
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    tracing::info!("Cli args: {cli:?}");

    // An unreachable database is a configuration error, so fail the whole
    // process here rather than letting every scheduled run fail separately
    let database = Database::open(&cli.db_path).await?;

    let reports = ReportSection::REFRESH_ORDER
        .iter()
        .map(|&section| {
            Arc::new(CachedStatsReport::new(section, database.clone())) as Arc<dyn StatsReport>
        })
        .collect();

    let dashboard_stats_task = DashboardStatsTask::new(
        Duration::seconds(cli.stats_interval_seconds),
        Arc::new(DatabaseDashboardData::new(database.clone())),
        Arc::new(DatabaseGroupMessenger::new(database)),
        reports,
    );

    let mut runner = TaskRunner::new(cli.task_runner_mode);
    runner.add_task(dashboard_stats_task).await;
    runner.run().await;

    Ok(())
}
