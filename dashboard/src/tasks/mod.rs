mod dashboard_stats_task;

pub use dashboard_stats_task::DashboardStatsTask;
