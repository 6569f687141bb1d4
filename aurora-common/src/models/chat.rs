use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Who wrote a message: the customer or the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(Error::Parse(format!("unknown chat role '{other}'"))),
        }
    }
}

/// One row of `chat_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i32,
    pub phone_number: String,
    pub role: Role,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub media_url: Option<String>,
    /// Row id of the quoted message, stored as text.
    pub quoted_sid: Option<String>,
}

impl ChatMessage {
    /// Key under which other rows reference this one through `quoted_sid`.
    pub fn quote_key(&self) -> String {
        self.id.to_string()
    }
}

/// Insert payload for a message the desk sent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChatMessage {
    pub phone_number: String,
    pub role: Role,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub media_url: Option<String>,
    pub quoted_sid: Option<String>,
}

impl NewChatMessage {
    /// An outbound agent reply stamped with the current UTC time.
    pub fn outbound(phone_number: &str, message: &str, media_url: Option<&str>) -> Self {
        Self {
            phone_number: phone_number.to_string(),
            role: Role::Assistant,
            message: message.to_string(),
            timestamp: Utc::now().naive_utc(),
            media_url: media_url.map(|s| s.to_string()),
            quoted_sid: None,
        }
    }
}

/// Latest row of one conversation, as shown in the conversation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub phone_number: String,
    pub last_message: String,
    pub last_timestamp: NaiveDateTime,
    pub last_media_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_both_ways() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert!("bot".parse::<Role>().is_err());
    }

    #[test]
    fn outbound_is_an_assistant_row() {
        let msg = NewChatMessage::outbound("+15551234", "hola", Some("https://i.ibb.co/x.png"));
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.media_url.as_deref(), Some("https://i.ibb.co/x.png"));
        assert!(msg.quoted_sid.is_none());
    }
}
