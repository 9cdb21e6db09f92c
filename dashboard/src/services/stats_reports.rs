use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashboard_database::Database;

use super::StatsReport;

/// The four cached report sections of the admin dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportSection {
    Index,
    General,
    Moderation,
    Default,
}

impl ReportSection {
    /// Refresh order keeps the most commonly viewed sections fresh first
    /// when a run gets cut short.
    pub const REFRESH_ORDER: [ReportSection; 4] = [
        ReportSection::Index,
        ReportSection::General,
        ReportSection::Moderation,
        ReportSection::Default,
    ];

    /// Stable key the snapshot is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            ReportSection::Index => "index",
            ReportSection::General => "general",
            ReportSection::Moderation => "moderation",
            ReportSection::Default => "default",
        }
    }

    /// Which activity events feed this section's counters.
    pub fn event_types(&self) -> &'static [&'static str] {
        match self {
            ReportSection::Index => &["visit", "signup", "topic_created", "post_created"],
            ReportSection::General => &["signup", "post_created", "like", "user_message"],
            ReportSection::Moderation => &["flag_created", "post_deleted", "user_suspended"],
            ReportSection::Default => &["visit", "signup", "post_created", "flag_created"],
        }
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Database-backed refresher for one dashboard report section.
pub struct CachedStatsReport {
    section: ReportSection,
    db: Database,
}

impl CachedStatsReport {
    pub fn new(section: ReportSection, db: Database) -> Self {
        Self { section, db }
    }
}

#[async_trait]
impl StatsReport for CachedStatsReport {
    fn section(&self) -> ReportSection {
        self.section
    }

    async fn refresh_stats(&self, now: DateTime<Utc>) -> anyhow::Result<()> {
        self.db
            .report_queries
            .refresh_report(self.section.key(), self.section.event_types(), now)
            .await?;

        Ok(())
    }
}
