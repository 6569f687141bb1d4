//! One-shot terminal commands over the same services the HTTP console uses.

use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;

use aurora_core::render::{alert_card, chat_list_item, AlertCard, ChatListItem, ThreadEntry};
use aurora_core::services::SentMessage;
use aurora_core::utils::time::parse_date_filter;
use aurora_core::Error;

use crate::state::AppState;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DeskCommand {
    /// List the latest message of each conversation.
    Chats {
        /// Only conversations with activity on this day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },
    /// Print a conversation, oldest first.
    Chat { phone: String },
    /// Send a text reply.
    Send { phone: String, text: String },
    /// Upload an image and send it.
    SendImage {
        phone: String,
        path: PathBuf,
        #[arg(long)]
        caption: Option<String>,
    },
    /// List unresolved alerts, newest first.
    Alerts {
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark an alert as answered.
    Resolve { id: i32 },
}

pub async fn run(command: &DeskCommand, state: &AppState) -> Result<(), Error> {
    match command {
        DeskCommand::Chats { date } => {
            let date = parse_date_filter(date.as_deref())?;
            let rows = state.conversations.recent_conversations(date).await?;
            if rows.is_empty() {
                println!("{}", "No conversations.".dimmed());
            }
            for row in rows.iter().map(chat_list_item) {
                println!("{}", chat_line(&row));
            }
        }
        DeskCommand::Chat { phone } => {
            let thread = state.conversations.thread(phone).await?;
            println!("{}", format!("💬 {}", thread.phone_number).bold());
            for entry in &thread.entries {
                for line in thread_lines(entry) {
                    println!("{line}");
                }
            }
        }
        DeskCommand::Send { phone, text } => {
            let sent = state.dispatch.send_text(phone, text).await?;
            println!("{}", sent_line(&sent).green());
        }
        DeskCommand::SendImage { phone, path, caption } => {
            let image = tokio::fs::read(path).await.map_err(|e| {
                Error::InvalidInput(format!("cannot read {}: {e}", path.display()))
            })?;
            let sent = state
                .dispatch
                .send_image(phone, &image, caption.as_deref())
                .await?;
            println!("{}", sent_line(&sent).green());
        }
        DeskCommand::Alerts { date } => {
            let date = parse_date_filter(date.as_deref())?;
            let alerts = state.alerts.pending(date).await?;
            if alerts.is_empty() {
                println!("{}", "No pending alerts.".dimmed());
            }
            for card in alerts.iter().map(alert_card) {
                println!("{}", alert_line(&card).yellow());
                println!("   {}", card.message);
            }
        }
        DeskCommand::Resolve { id } => {
            state.alerts.resolve(*id).await?;
            println!("{}", format!("#{id} Marcado como respondido").green());
        }
    }
    Ok(())
}

pub fn chat_line(item: &ChatListItem) -> String {
    format!("{}  {}  {}", item.timestamp_label, item.phone_number, item.preview)
}

pub fn alert_line(card: &AlertCard) -> String {
    format!("#{} {} ({})", card.id, card.header, card.timestamp_label)
}

pub fn sent_line(sent: &SentMessage) -> String {
    format!("✅ Enviado correctamente (SID: {})", sent.sid)
}

/// A bubble as terminal lines: optional quote, then the message itself.
pub fn thread_lines(entry: &ThreadEntry) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(quote) = &entry.quote {
        lines.push(format!("    ┆ {} {}", quote.side.icon(), quote.text));
    } else if entry.quote_unavailable {
        lines.push("    ┆ (mensaje citado no disponible)".to_string());
    }
    let mut body = format!("{} [{}] {}", entry.icon, entry.timestamp_label, entry.text);
    if let Some(url) = &entry.media_url {
        body.push_str(&format!(" <{url}>"));
    }
    lines.push(body);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::render::build_thread;
    use aurora_core::test_utils::helpers::{at, chat_message, pending_alert};
    use aurora_common::models::Role;

    #[test]
    fn alert_line_carries_id_and_name_fallback() {
        let card = alert_card(&pending_alert(7, "+5215550001", None, at(2024, 1, 2, 9, 15)));
        assert_eq!(alert_line(&card), "#7 📞 +5215550001 – Sin nombre (2024-01-02 09:15)");
    }

    #[test]
    fn quoted_reply_prints_quote_first() {
        let first = chat_message(1, "+1", Role::User, "¿tienen talla M?", at(2024, 1, 2, 10, 0));
        let mut reply = chat_message(2, "+1", Role::Assistant, "Sí", at(2024, 1, 2, 10, 5));
        reply.quoted_sid = Some("1".into());
        let thread = build_thread("+1", &[first, reply]);

        let lines = thread_lines(&thread.entries[1]);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("¿tienen talla M?"));
        assert_eq!(lines[1], "🤖 [2024-01-02 10:05] Sí");
    }

    #[test]
    fn missing_quote_gets_placeholder() {
        let mut reply = chat_message(2, "+1", Role::Assistant, "Sí", at(2024, 1, 2, 10, 5));
        reply.quoted_sid = Some("999".into());
        let thread = build_thread("+1", &[reply]);
        assert!(thread_lines(&thread.entries[0])[0].contains("no disponible"));
    }
}
