use std::collections::HashMap;

use serde::Serialize;

use aurora_common::models::{ChatMessage, Role};
use crate::render::{preview, IMAGE_PLACEHOLDER};
use crate::utils::time::timestamp_label;

const QUOTE_PREVIEW_CHARS: usize = 140;

/// Where a bubble sits: customers on the left, the desk on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Customer,
    Agent,
}

impl From<Role> for Side {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Side::Customer,
            Role::Assistant => Side::Agent,
        }
    }
}

impl Side {
    pub fn icon(&self) -> &'static str {
        match self {
            Side::Customer => "👤",
            Side::Agent => "🤖",
        }
    }
}

/// The quoted message drawn above a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotePreview {
    pub message_id: i32,
    pub side: Side,
    pub text: String,
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadEntry {
    pub id: i32,
    pub side: Side,
    pub icon: &'static str,
    pub timestamp_label: String,
    pub text: String,
    pub media_url: Option<String>,
    pub quote: Option<QuotePreview>,
    /// The message quotes something this thread cannot show: a row outside
    /// the loaded history, another conversation, or a later message.
    pub quote_unavailable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadView {
    pub phone_number: String,
    pub entries: Vec<ThreadEntry>,
}

/// Render a conversation. Quotes resolve only against `messages` itself.
pub fn build_thread(phone_number: &str, messages: &[ChatMessage]) -> ThreadView {
    let by_key: HashMap<String, &ChatMessage> =
        messages.iter().map(|m| (m.quote_key(), m)).collect();

    let entries = messages
        .iter()
        .map(|msg| {
            let side = Side::from(msg.role);
            let quoted_key = msg
                .quoted_sid
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty());

            let quote = quoted_key
                .and_then(|key| by_key.get(key).copied())
                .filter(|quoted| {
                    quoted.id != msg.id
                        && quoted.phone_number == msg.phone_number
                        && quoted.timestamp <= msg.timestamp
                })
                .map(quote_preview);

            ThreadEntry {
                id: msg.id,
                side,
                icon: side.icon(),
                timestamp_label: timestamp_label(msg.timestamp),
                text: msg.message.clone(),
                media_url: msg.media_url.clone(),
                quote_unavailable: quoted_key.is_some() && quote.is_none(),
                quote,
            }
        })
        .collect();

    ThreadView {
        phone_number: phone_number.to_string(),
        entries,
    }
}

fn quote_preview(quoted: &ChatMessage) -> QuotePreview {
    let text = if quoted.message.trim().is_empty() && quoted.media_url.is_some() {
        IMAGE_PLACEHOLDER.to_string()
    } else {
        preview(&quoted.message, QUOTE_PREVIEW_CHARS)
    };
    QuotePreview {
        message_id: quoted.id,
        side: Side::from(quoted.role),
        text,
        media_url: quoted.media_url.clone(),
    }
}
