// src/platforms/twilio.rs
//
// WhatsApp delivery through the Twilio Messages REST endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use aurora_common::traits::provider_traits::{MessagingProvider, OutboundMessage};
use crate::http::{FormRequest, HttpClient};
use crate::platforms::ERROR_BODY_CHARS;
use crate::render::preview;
use crate::Error;

pub const WHATSAPP_PREFIX: &str = "whatsapp:";
pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";

/// The number without any `whatsapp:` prefix (repeated or any case).
/// Conversations are keyed by this form.
pub fn bare_number(number: &str) -> &str {
    let mut bare = number.trim();
    while let Some(head) = bare.get(..WHATSAPP_PREFIX.len()) {
        if !head.eq_ignore_ascii_case(WHATSAPP_PREFIX) {
            break;
        }
        bare = bare[WHATSAPP_PREFIX.len()..].trim_start();
    }
    bare
}

/// Normalize a number to `whatsapp:<number>`, whether or not it already
/// carries the prefix.
pub fn whatsapp_address(number: &str) -> String {
    format!("{WHATSAPP_PREFIX}{}", bare_number(number))
}

#[derive(Clone)]
pub struct TwilioSettings {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Sender number, with or without the `whatsapp:` prefix.
    pub from_number: Option<String>,
    pub api_base: String,
}

impl std::fmt::Debug for TwilioSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioSettings")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("from_number", &self.from_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for TwilioSettings {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base: DEFAULT_TWILIO_API_BASE.to_string(),
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, Error> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{name} is not set")))
}

#[derive(Debug, Deserialize)]
struct CreatedMessage {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    code: Option<i64>,
    message: Option<String>,
}

pub struct TwilioMessenger {
    settings: TwilioSettings,
    http: Arc<dyn HttpClient>,
}

impl TwilioMessenger {
    pub fn new(settings: TwilioSettings, http: Arc<dyn HttpClient>) -> Self {
        Self { settings, http }
    }

    /// Build the provider request. Fails before any I/O when credentials are
    /// missing or there is nothing to send.
    pub fn build_request(&self, message: &OutboundMessage) -> Result<FormRequest, Error> {
        let sid = required(&self.settings.account_sid, "TWILIO_ACCOUNT_SID")?;
        let token = required(&self.settings.auth_token, "TWILIO_AUTH_TOKEN")?;
        let from = required(&self.settings.from_number, "TWILIO_NUMBER")?;

        let body = message.body.as_deref().filter(|b| !b.trim().is_empty());
        let media = message.media_url.as_deref().filter(|m| !m.trim().is_empty());
        if body.is_none() && media.is_none() {
            return Err(Error::InvalidInput("message has neither text nor media".into()));
        }
        if message.to.trim().is_empty() {
            return Err(Error::InvalidInput("recipient number is empty".into()));
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.settings.api_base.trim_end_matches('/'),
            sid
        );
        let mut request = FormRequest::new(url)
            .basic_auth(sid, token)
            .field("From", &whatsapp_address(from))
            .field("To", &whatsapp_address(&message.to));
        if let Some(body) = body {
            request = request.field("Body", body);
        }
        if let Some(media) = media {
            request = request.field("MediaUrl", media);
        }
        Ok(request)
    }
}

#[async_trait]
impl MessagingProvider for TwilioMessenger {
    async fn send(&self, message: &OutboundMessage) -> Result<String, Error> {
        let request = self.build_request(message)?;
        let to = request.field_value("To").unwrap_or_default().to_string();
        let response = self.http.post_form(request).await?;

        if !response.is_success() {
            let parsed: Option<TwilioError> = serde_json::from_str(&response.body).ok();
            let (code, text) = match parsed {
                Some(e) => (e.code, e.message.unwrap_or_else(|| preview(&response.body, ERROR_BODY_CHARS))),
                None => (None, preview(&response.body, ERROR_BODY_CHARS)),
            };
            warn!(to = %to, status = response.status, ?code, "Twilio rejected message");
            return Err(Error::Provider {
                provider: "twilio",
                status: response.status,
                code,
                message: text,
            });
        }

        let created: CreatedMessage = serde_json::from_str(&response.body)?;
        info!(to = %to, sid = %created.sid, "WhatsApp message accepted");
        Ok(created.sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_added_once() {
        assert_eq!(whatsapp_address("+15551234"), "whatsapp:+15551234");
        assert_eq!(whatsapp_address("whatsapp:+15551234"), "whatsapp:+15551234");
        assert_eq!(whatsapp_address(" WhatsApp:+15551234 "), "whatsapp:+15551234");
        assert_eq!(whatsapp_address("whatsapp:whatsapp:+15551234"), "whatsapp:+15551234");
    }

    #[test]
    fn bare_number_strips_every_prefix() {
        assert_eq!(bare_number("+15551234"), "+15551234");
        assert_eq!(bare_number(" whatsapp:+15551234"), "+15551234");
        assert_eq!(bare_number("WHATSAPP: whatsapp:+15551234 "), "+15551234");
    }

    #[test]
    fn debug_hides_token() {
        let settings = TwilioSettings {
            auth_token: Some("secret".into()),
            ..Default::default()
        };
        assert!(!format!("{settings:?}").contains("secret"));
    }
}
