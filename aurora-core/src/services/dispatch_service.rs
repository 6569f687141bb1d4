// File: aurora-core/src/services/dispatch_service.rs

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use aurora_common::models::NewChatMessage;
use aurora_common::traits::provider_traits::{ImageHost, MessagingProvider, OutboundMessage};
use aurora_common::traits::repository_traits::ChatHistoryRepository;
use crate::platforms::bare_number;
use crate::Error;

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMessage {
    /// Provider-assigned delivery id.
    pub sid: String,
    /// Row id of the recorded `chat_history` entry.
    pub message_id: i32,
    pub media_url: Option<String>,
}

/// Sends agent replies and records them in the conversation.
///
/// Each step either succeeds or aborts the whole send; nothing is rolled
/// back, so an image uploaded before a failed delivery stays on the host.
pub struct DispatchService {
    messenger: Arc<dyn MessagingProvider>,
    images: Arc<dyn ImageHost>,
    history: Arc<dyn ChatHistoryRepository>,
}

impl DispatchService {
    pub fn new(
        messenger: Arc<dyn MessagingProvider>,
        images: Arc<dyn ImageHost>,
        history: Arc<dyn ChatHistoryRepository>,
    ) -> Self {
        Self {
            messenger,
            images,
            history,
        }
    }

    pub async fn send_text(&self, phone_number: &str, text: &str) -> Result<SentMessage, Error> {
        let phone_number = conversation_key(phone_number)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("reply text is empty".into()));
        }

        let sid = self
            .messenger
            .send(&OutboundMessage::text(phone_number, text))
            .await?;
        let message_id = self.record(&sid, NewChatMessage::outbound(phone_number, text, None)).await?;

        info!(phone_number, %sid, message_id, "text reply sent");
        Ok(SentMessage {
            sid,
            message_id,
            media_url: None,
        })
    }

    /// Upload, deliver, record. `caption` may be empty.
    pub async fn send_image(
        &self,
        phone_number: &str,
        image: &[u8],
        caption: Option<&str>,
    ) -> Result<SentMessage, Error> {
        let phone_number = conversation_key(phone_number)?;
        let caption = caption.map(str::trim).filter(|c| !c.is_empty());

        let media_url = self.images.upload(image).await?;
        let sid = self
            .messenger
            .send(&OutboundMessage::media(phone_number, &media_url, caption))
            .await?;
        let row = NewChatMessage::outbound(phone_number, caption.unwrap_or_default(), Some(&media_url));
        let message_id = self.record(&sid, row).await?;

        info!(phone_number, %sid, message_id, %media_url, "image reply sent");
        Ok(SentMessage {
            sid,
            message_id,
            media_url: Some(media_url),
        })
    }

    async fn record(&self, sid: &str, row: NewChatMessage) -> Result<i32, Error> {
        self.history.insert_message(&row).await.map_err(|e| {
            error!(%sid, phone_number = %row.phone_number, "delivered but not recorded: {e}");
            e
        })
    }
}

/// The key a reply is sent to and recorded under, with no `whatsapp:` prefix.
pub(crate) fn conversation_key(phone_number: &str) -> Result<&str, Error> {
    let bare = bare_number(phone_number);
    if bare.is_empty() {
        return Err(Error::InvalidInput("phone number is empty".into()));
    }
    Ok(bare)
}
