//! Display-ready views of conversations and alerts.
//!
//! These carry no layout; they are what any front end (the JSON API, the
//! terminal commands) needs to draw a thread, a conversation list or the
//! alert queue.

pub mod thread;
pub mod alerts;
pub mod chats;

pub use thread::{build_thread, QuotePreview, Side, ThreadEntry, ThreadView};
pub use alerts::{alert_card, AlertCard};
pub use chats::{chat_list_item, ChatListItem};

/// Shown in place of an empty caption on an image message.
pub const IMAGE_PLACEHOLDER: &str = "📷 Imagen";

/// Shorten `text` to `max` characters, marking the cut with an ellipsis.
pub fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max).collect();
    out.push('…');
    out
}
