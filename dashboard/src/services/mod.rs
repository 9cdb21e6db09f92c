mod dashboard_data;
mod group_messenger;
mod stats_reports;

pub use dashboard_data::DatabaseDashboardData;
pub use group_messenger::DatabaseGroupMessenger;
pub use stats_reports::{CachedStatsReport, ReportSection};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

#[cfg(test)]
use mockall::automock;

/// Groups that always exist, created by the database schema rather than by
/// an administrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltInRole {
    Admins,
}

impl BuiltInRole {
    pub fn key(&self) -> &'static str {
        match self {
            BuiltInRole::Admins => "admins",
        }
    }
}

/// Whether a group message was delivered or suppressed by the dedup window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    AlreadySent,
}

/// Read access to the problem state maintained by the admin dashboard
/// subsystem.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DashboardDataStore: Send + Sync {
    /// When problems were first detected, or `None` when there are no
    /// ongoing problems.
    async fn problems_started_at(&self) -> anyhow::Result<Option<DateTime<Utc>>>;
}

/// A cached dashboard statistics report that can recompute its snapshot.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatsReport: Send + Sync {
    fn section(&self) -> ReportSection;
    async fn refresh_stats(&self, now: DateTime<Utc>) -> anyhow::Result<()>;
}

/// Delivers messages to groups, suppressing repeats within a dedup window.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GroupMessenger: Send + Sync {
    async fn send_to_built_in_group(
        &self,
        role: BuiltInRole,
        message_kind: &str,
        dedup_window: Duration,
    ) -> anyhow::Result<SendOutcome>;
}
