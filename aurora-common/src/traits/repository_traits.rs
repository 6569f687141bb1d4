use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Error;
use crate::models::{ChatMessage, ConversationSummary, NewChatMessage, PendingAlert};

/// Read/append access to `chat_history`. Rows are never updated or deleted.
#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    /// Every message of one conversation, oldest first.
    async fn list_conversation(&self, phone_number: &str) -> Result<Vec<ChatMessage>, Error>;

    /// The newest row per phone number, ordered by phone number.
    /// With `on_date`, only conversations with a message on that day count
    /// and the summary row is the newest one from that day.
    async fn latest_per_conversation(
        &self,
        on_date: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<ConversationSummary>, Error>;

    /// Append a row, returning its id.
    async fn insert_message(&self, msg: &NewChatMessage) -> Result<i32, Error>;
}

/// Access to `alertas_pendientes`.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Unresolved alerts, newest first, optionally only those created on `on_date`.
    async fn list_unresolved(&self, on_date: Option<NaiveDate>) -> Result<Vec<PendingAlert>, Error>;

    async fn get_alert(&self, alert_id: i32) -> Result<Option<PendingAlert>, Error>;

    /// Flip `respondido` to true. Resolving a resolved or unknown alert is a no-op.
    async fn mark_resolved(&self, alert_id: i32) -> Result<(), Error>;
}
