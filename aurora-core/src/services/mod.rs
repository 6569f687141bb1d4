pub mod conversation_service;
pub mod dispatch_service;
pub mod alert_service;

pub use conversation_service::{ConversationService, RECENT_CHATS_LIMIT};
pub use dispatch_service::{DispatchService, SentMessage};
pub use alert_service::AlertService;
