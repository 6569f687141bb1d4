pub mod repository_traits;
pub mod provider_traits;

pub use repository_traits::{AlertRepository, ChatHistoryRepository};
pub use provider_traits::{ImageHost, MessagingProvider, OutboundMessage};
