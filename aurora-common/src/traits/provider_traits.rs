use async_trait::async_trait;

use crate::error::Error;

/// A message handed to the delivery provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient phone number, with or without the transport prefix.
    pub to: String,
    pub body: Option<String>,
    pub media_url: Option<String>,
}

impl OutboundMessage {
    pub fn text(to: &str, body: &str) -> Self {
        Self {
            to: to.to_string(),
            body: Some(body.to_string()),
            media_url: None,
        }
    }

    pub fn media(to: &str, media_url: &str, caption: Option<&str>) -> Self {
        Self {
            to: to.to_string(),
            body: caption.map(|c| c.to_string()),
            media_url: Some(media_url.to_string()),
        }
    }
}

/// Outbound WhatsApp delivery.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Send one message, returning the provider-assigned delivery id.
    async fn send(&self, message: &OutboundMessage) -> Result<String, Error>;
}

/// Public image hosting.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload raw image bytes, returning a publicly retrievable URL.
    async fn upload(&self, image: &[u8]) -> Result<String, Error>;
}
