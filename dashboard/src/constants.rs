use chrono::Duration;

/// How often the dashboard stats task runs.
pub const DASHBOARD_STATS_INTERVAL: Duration = Duration::minutes(30);

/// How long problems must have been continuously reported on the admin
/// dashboard before the admins group is messaged about them.
pub const PROBLEM_NOTIFICATION_AFTER: Duration = Duration::days(2);

/// Admins are messaged about ongoing dashboard problems no more often
/// than this.
pub const PROBLEM_NOTIFICATION_DEDUP_WINDOW: Duration = Duration::days(7);

/// Message kind recorded against dashboard problem notifications.
pub const DASHBOARD_PROBLEMS_MESSAGE_KIND: &str = "dashboard_problems";
