use async_trait::async_trait;
use chrono::Duration;
use dashboard_database::Database;

use crate::time;

use super::{BuiltInRole, GroupMessenger, SendOutcome};

/// Group messaging backed by the service database.
///
/// Creating the message row is the delivery: group inboxes are read out of
/// the same table, and the row doubles as the dedup record so a failed
/// insert can never count as a send.
pub struct DatabaseGroupMessenger {
    db: Database,
}

impl DatabaseGroupMessenger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GroupMessenger for DatabaseGroupMessenger {
    async fn send_to_built_in_group(
        &self,
        role: BuiltInRole,
        message_kind: &str,
        dedup_window: Duration,
    ) -> anyhow::Result<SendOutcome> {
        let Some(group_name) = self.db.group_queries.built_in_group_name(role.key()).await? else {
            anyhow::bail!("built-in group '{}' is missing from the database", role.key());
        };

        let created = self
            .db
            .group_message_queries
            .create_unless_recent(&group_name, message_kind, dedup_window, time::now())
            .await?;

        if created {
            Ok(SendOutcome::Sent)
        } else {
            Ok(SendOutcome::AlreadySent)
        }
    }
}
