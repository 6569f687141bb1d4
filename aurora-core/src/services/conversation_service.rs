// File: aurora-core/src/services/conversation_service.rs

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use aurora_common::models::{ChatMessage, ConversationSummary};
use aurora_common::traits::repository_traits::ChatHistoryRepository;
use crate::cache::RecentChatsCache;
use crate::services::dispatch_service::conversation_key;
use crate::render::thread::{build_thread, ThreadView};
use crate::Error;

/// Most conversations the list ever shows.
pub const RECENT_CHATS_LIMIT: i64 = 50;

pub struct ConversationService {
    history: Arc<dyn ChatHistoryRepository>,
    recent: RecentChatsCache,
}

impl ConversationService {
    pub fn new(history: Arc<dyn ChatHistoryRepository>, recent_ttl: Duration) -> Self {
        Self {
            history,
            recent: RecentChatsCache::new(recent_ttl),
        }
    }

    /// Full history of one conversation, oldest first.
    pub async fn conversation(&self, phone_number: &str) -> Result<Vec<ChatMessage>, Error> {
        let phone_number = conversation_key(phone_number)?;
        self.history.list_conversation(phone_number).await
    }

    /// Conversation history rendered for display, quotes resolved.
    pub async fn thread(&self, phone_number: &str) -> Result<ThreadView, Error> {
        let messages = self.conversation(phone_number).await?;
        Ok(build_thread(conversation_key(phone_number)?, &messages))
    }

    /// One summary per conversation active on `on_date` (or ever, with `None`),
    /// ordered by phone number, at most [`RECENT_CHATS_LIMIT`] rows.
    pub async fn recent_conversations(
        &self,
        on_date: Option<NaiveDate>,
    ) -> Result<Vec<ConversationSummary>, Error> {
        if let Some(hit) = self.recent.get(&on_date) {
            debug!(?on_date, rows = hit.len(), "recent chats served from cache");
            return Ok(hit);
        }
        let rows = self
            .history
            .latest_per_conversation(on_date, RECENT_CHATS_LIMIT)
            .await?;
        self.recent.insert(on_date, rows.clone());
        Ok(rows)
    }

    /// Drop cached conversation lists, e.g. after the desk wrote a message.
    pub fn invalidate_recent(&self) {
        self.recent.invalidate_all();
    }
}
