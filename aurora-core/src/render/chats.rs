use serde::Serialize;

use aurora_common::models::ConversationSummary;
use crate::render::{preview, IMAGE_PLACEHOLDER};
use crate::utils::time::timestamp_label;

const LIST_PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatListItem {
    pub phone_number: String,
    pub preview: String,
    pub timestamp_label: String,
    pub has_media: bool,
}

pub fn chat_list_item(summary: &ConversationSummary) -> ChatListItem {
    let has_media = summary.last_media_url.is_some();
    let text = if summary.last_message.trim().is_empty() && has_media {
        IMAGE_PLACEHOLDER.to_string()
    } else {
        preview(&summary.last_message, LIST_PREVIEW_CHARS)
    };
    ChatListItem {
        phone_number: summary.phone_number.clone(),
        preview: text,
        timestamp_label: timestamp_label(summary.last_timestamp),
        has_media,
    }
}
