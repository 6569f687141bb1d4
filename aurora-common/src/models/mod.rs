// File: aurora-common/src/models/mod.rs
pub mod chat;
pub mod alert;

pub use chat::{ChatMessage, ConversationSummary, NewChatMessage, Role};
pub use alert::PendingAlert;
