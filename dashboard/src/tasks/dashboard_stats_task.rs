use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::{
    constants::{
        DASHBOARD_PROBLEMS_MESSAGE_KIND, PROBLEM_NOTIFICATION_AFTER,
        PROBLEM_NOTIFICATION_DEDUP_WINDOW,
    },
    services::{BuiltInRole, DashboardDataStore, GroupMessenger, SendOutcome, StatsReport},
    task::Task,
    time,
};

/// Periodic dashboard maintenance: message the admins group when problems
/// have been reported for a while, then refresh the cached statistics
/// reports.
pub struct DashboardStatsTask {
    interval: Duration,
    dashboard_data: Arc<dyn DashboardDataStore>,
    messenger: Arc<dyn GroupMessenger>,
    reports: Vec<Arc<dyn StatsReport>>,
}

impl DashboardStatsTask {
    pub fn new(
        interval: Duration,
        dashboard_data: Arc<dyn DashboardDataStore>,
        messenger: Arc<dyn GroupMessenger>,
        reports: Vec<Arc<dyn StatsReport>>,
    ) -> Self {
        Self {
            interval,
            dashboard_data,
            messenger,
            reports,
        }
    }

    async fn maybe_notify_admins(&self, now: DateTime<Utc>) {
        let problems_started_at = match self.dashboard_data.problems_started_at().await {
            Ok(problems_started_at) => problems_started_at,
            Err(e) => {
                tracing::error!("Failed to read dashboard problem state: {}", e);
                return;
            }
        };

        let Some(problems_started_at) = problems_started_at else {
            return;
        };

        if problems_started_at >= now - PROBLEM_NOTIFICATION_AFTER {
            // Problems are ongoing but haven't persisted long enough to
            // warrant messaging the admins yet
            return;
        }

        let outcome = self
            .messenger
            .send_to_built_in_group(
                BuiltInRole::Admins,
                DASHBOARD_PROBLEMS_MESSAGE_KIND,
                PROBLEM_NOTIFICATION_DEDUP_WINDOW,
            )
            .await;

        match outcome {
            Ok(SendOutcome::Sent) => {
                tracing::info!(
                    "Dashboard problems ongoing since {}, messaged the admins group",
                    problems_started_at
                );
            }
            Ok(SendOutcome::AlreadySent) => {
                tracing::debug!(
                    "Dashboard problems ongoing since {}, admins group was already messaged recently",
                    problems_started_at
                );
            }
            Err(e) => {
                tracing::error!(
                    "Failed to message admins group about dashboard problems: {}",
                    e
                );
            }
        }
    }
}

#[async_trait]
impl Task for DashboardStatsTask {
    fn name(&self) -> &'static str {
        "dashboard_stats"
    }

    async fn run(&self) -> anyhow::Result<()> {
        let now = time::now();

        self.maybe_notify_admins(now).await;

        // Refresh every report even when one fails so a single bad metrics
        // source cannot blank out the rest of the dashboard
        for report in &self.reports {
            if let Err(e) = report.refresh_stats(now).await {
                tracing::error!(
                    "Failed to refresh {} dashboard stats: {}",
                    report.section(),
                    e
                );
            }
        }

        Ok(())
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::Sequence;

    use super::*;
    use crate::services::{
        MockDashboardDataStore, MockGroupMessenger, MockStatsReport, ReportSection,
    };

    fn reports_expecting_refresh() -> Vec<Arc<dyn StatsReport>> {
        let mut seq = Sequence::new();

        ReportSection::REFRESH_ORDER
            .iter()
            .map(|&section| {
                let mut report = MockStatsReport::new();
                report.expect_section().return_const(section);
                report
                    .expect_refresh_stats()
                    .times(1)
                    .in_sequence(&mut seq)
                    .returning(|_| Ok(()));

                Arc::new(report) as Arc<dyn StatsReport>
            })
            .collect()
    }

    fn task(
        dashboard_data: MockDashboardDataStore,
        messenger: MockGroupMessenger,
        reports: Vec<Arc<dyn StatsReport>>,
    ) -> DashboardStatsTask {
        DashboardStatsTask::new(
            Duration::minutes(30),
            Arc::new(dashboard_data),
            Arc::new(messenger),
            reports,
        )
    }

    #[tokio::test]
    async fn no_problems_means_no_message_and_all_reports_refreshed() {
        let mut dashboard_data = MockDashboardDataStore::new();
        dashboard_data
            .expect_problems_started_at()
            .times(1)
            .returning(|| Ok(None));

        let mut messenger = MockGroupMessenger::new();
        messenger.expect_send_to_built_in_group().times(0);

        let task = task(dashboard_data, messenger, reports_expecting_refresh());

        task.run().await.unwrap();
    }

    #[tokio::test]
    async fn recent_problems_do_not_message_the_admins() {
        let problems_started_at = Utc::now() - Duration::days(1);

        let mut dashboard_data = MockDashboardDataStore::new();
        dashboard_data
            .expect_problems_started_at()
            .times(1)
            .returning(move || Ok(Some(problems_started_at)));

        let mut messenger = MockGroupMessenger::new();
        messenger.expect_send_to_built_in_group().times(0);

        let task = task(dashboard_data, messenger, reports_expecting_refresh());

        task.run().await.unwrap();
    }

    #[tokio::test]
    async fn long_running_problems_message_the_admins() {
        let problems_started_at = Utc::now() - Duration::days(3);

        let mut dashboard_data = MockDashboardDataStore::new();
        dashboard_data
            .expect_problems_started_at()
            .times(1)
            .returning(move || Ok(Some(problems_started_at)));

        let mut messenger = MockGroupMessenger::new();
        messenger
            .expect_send_to_built_in_group()
            .times(1)
            .withf(|role, message_kind, dedup_window| {
                *role == BuiltInRole::Admins
                    && message_kind == DASHBOARD_PROBLEMS_MESSAGE_KIND
                    && *dedup_window == PROBLEM_NOTIFICATION_DEDUP_WINDOW
            })
            .returning(|_, _, _| Ok(SendOutcome::Sent));

        let task = task(dashboard_data, messenger, reports_expecting_refresh());

        task.run().await.unwrap();
    }

    #[tokio::test]
    async fn suppressed_message_still_refreshes_reports() {
        let problems_started_at = Utc::now() - Duration::days(3);

        let mut dashboard_data = MockDashboardDataStore::new();
        dashboard_data
            .expect_problems_started_at()
            .times(1)
            .returning(move || Ok(Some(problems_started_at)));

        let mut messenger = MockGroupMessenger::new();
        messenger
            .expect_send_to_built_in_group()
            .times(1)
            .returning(|_, _, _| Ok(SendOutcome::AlreadySent));

        let task = task(dashboard_data, messenger, reports_expecting_refresh());

        task.run().await.unwrap();
    }

    #[tokio::test]
    async fn problem_state_read_failure_skips_messaging_but_not_refreshes() {
        let mut dashboard_data = MockDashboardDataStore::new();
        dashboard_data
            .expect_problems_started_at()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("problem state unavailable")));

        let mut messenger = MockGroupMessenger::new();
        messenger.expect_send_to_built_in_group().times(0);

        let task = task(dashboard_data, messenger, reports_expecting_refresh());

        task.run().await.unwrap();
    }

    #[tokio::test]
    async fn send_failure_does_not_abort_the_run() {
        let problems_started_at = Utc::now() - Duration::days(3);

        let mut dashboard_data = MockDashboardDataStore::new();
        dashboard_data
            .expect_problems_started_at()
            .times(1)
            .returning(move || Ok(Some(problems_started_at)));

        let mut messenger = MockGroupMessenger::new();
        messenger
            .expect_send_to_built_in_group()
            .times(1)
            .returning(|_, _, _| Err(anyhow::anyhow!("messaging unavailable")));

        let task = task(dashboard_data, messenger, reports_expecting_refresh());

        task.run().await.unwrap();
    }

    #[tokio::test]
    async fn one_failing_report_does_not_stop_the_others() {
        let mut dashboard_data = MockDashboardDataStore::new();
        dashboard_data
            .expect_problems_started_at()
            .times(1)
            .returning(|| Ok(None));

        let mut messenger = MockGroupMessenger::new();
        messenger.expect_send_to_built_in_group().times(0);

        let reports = ReportSection::REFRESH_ORDER
            .iter()
            .map(|&section| {
                let mut report = MockStatsReport::new();
                report.expect_section().return_const(section);

                if section == ReportSection::General {
                    report
                        .expect_refresh_stats()
                        .times(1)
                        .returning(|_| Err(anyhow::anyhow!("metrics source down")));
                } else {
                    report.expect_refresh_stats().times(1).returning(|_| Ok(()));
                }

                Arc::new(report) as Arc<dyn StatsReport>
            })
            .collect();

        let task = task(dashboard_data, messenger, reports);

        task.run().await.unwrap();
    }
}
