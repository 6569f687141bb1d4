// src/repositories/memory.rs
//
// Process-local stand-in for both desk tables. Ordering, filtering and the
// result cap follow the Postgres queries.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use aurora_common::models::{ChatMessage, ConversationSummary, NewChatMessage, PendingAlert};
use aurora_common::traits::repository_traits::{AlertRepository, ChatHistoryRepository};
use crate::Error;

#[derive(Default)]
struct Tables {
    chat_history: Vec<ChatMessage>,
    alerts: Vec<PendingAlert>,
}

#[derive(Default)]
pub struct InMemoryDesk {
    tables: Mutex<Tables>,
}

impl InMemoryDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a message as the webhook would, keeping its id.
    pub fn push_message(&self, msg: ChatMessage) {
        self.tables.lock().chat_history.push(msg);
    }

    /// Store an alert as the classifier would, keeping its id.
    pub fn push_alert(&self, alert: PendingAlert) {
        self.tables.lock().alerts.push(alert);
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.tables.lock().chat_history.clone()
    }

    pub fn alerts(&self) -> Vec<PendingAlert> {
        self.tables.lock().alerts.clone()
    }
}

#[async_trait]
impl ChatHistoryRepository for InMemoryDesk {
    async fn list_conversation(&self, phone_number: &str) -> Result<Vec<ChatMessage>, Error> {
        let tables = self.tables.lock();
        let mut rows: Vec<ChatMessage> = tables
            .chat_history
            .iter()
            .filter(|m| m.phone_number == phone_number)
            .cloned()
            .collect();
        rows.sort_by_key(|m| (m.timestamp, m.id));
        Ok(rows)
    }

    async fn latest_per_conversation(
        &self,
        on_date: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<ConversationSummary>, Error> {
        let tables = self.tables.lock();
        let mut latest: BTreeMap<&str, &ChatMessage> = BTreeMap::new();
        for msg in &tables.chat_history {
            if let Some(day) = on_date {
                if msg.timestamp.date() != day {
                    continue;
                }
            }
            let slot = latest.entry(msg.phone_number.as_str()).or_insert(msg);
            if (msg.timestamp, msg.id) > (slot.timestamp, slot.id) {
                *slot = msg;
            }
        }

        let cap = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(latest
            .into_values()
            .take(cap)
            .map(|m| ConversationSummary {
                phone_number: m.phone_number.clone(),
                last_message: m.message.clone(),
                last_timestamp: m.timestamp,
                last_media_url: m.media_url.clone(),
            })
            .collect())
    }

    async fn insert_message(&self, msg: &NewChatMessage) -> Result<i32, Error> {
        let mut tables = self.tables.lock();
        let id = tables.chat_history.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        tables.chat_history.push(ChatMessage {
            id,
            phone_number: msg.phone_number.clone(),
            role: msg.role,
            message: msg.message.clone(),
            timestamp: msg.timestamp,
            media_url: msg.media_url.clone(),
            quoted_sid: msg.quoted_sid.clone(),
        });
        Ok(id)
    }
}

#[async_trait]
impl AlertRepository for InMemoryDesk {
    async fn list_unresolved(&self, on_date: Option<NaiveDate>) -> Result<Vec<PendingAlert>, Error> {
        let tables = self.tables.lock();
        let mut rows: Vec<PendingAlert> = tables
            .alerts
            .iter()
            .filter(|a| !a.resolved)
            .filter(|a| on_date.map_or(true, |day| a.created_at.date() == day))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn get_alert(&self, alert_id: i32) -> Result<Option<PendingAlert>, Error> {
        Ok(self.tables.lock().alerts.iter().find(|a| a.id == alert_id).cloned())
    }

    async fn mark_resolved(&self, alert_id: i32) -> Result<(), Error> {
        let mut tables = self.tables.lock();
        for alert in tables.alerts.iter_mut().filter(|a| a.id == alert_id) {
            alert.resolved = true;
        }
        Ok(())
    }
}
