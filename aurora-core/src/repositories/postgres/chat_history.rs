// src/repositories/postgres/chat_history.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use aurora_common::models::{ChatMessage, ConversationSummary, NewChatMessage, Role};
use aurora_common::traits::repository_traits::ChatHistoryRepository;
use crate::Error;

#[derive(Clone)]
pub struct PostgresChatHistoryRepository {
    pool: Pool<Postgres>,
}

impl PostgresChatHistoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &PgRow) -> Result<ChatMessage, Error> {
    let role: String = row.try_get("role")?;
    Ok(ChatMessage {
        id: row.try_get("id")?,
        phone_number: row.try_get("phone_number")?,
        role: role.parse::<Role>()?,
        message: row.try_get::<Option<String>, _>("message")?.unwrap_or_default(),
        timestamp: row.try_get("timestamp")?,
        media_url: row.try_get("media_url")?,
        quoted_sid: row.try_get("quoted_sid")?,
    })
}

#[async_trait]
impl ChatHistoryRepository for PostgresChatHistoryRepository {
    async fn list_conversation(&self, phone_number: &str) -> Result<Vec<ChatMessage>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, phone_number, role, message, timestamp, media_url, quoted_sid
            FROM chat_history
            WHERE phone_number = $1
            ORDER BY timestamp ASC, id ASC
            "#,
        )
            .bind(phone_number)
            .fetch_all(&self.pool)
            .await?;

        debug!(phone_number, rows = rows.len(), "loaded conversation");
        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            messages.push(message_from_row(&row)?);
        }
        Ok(messages)
    }

    async fn latest_per_conversation(
        &self,
        on_date: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<ConversationSummary>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT ON (phone_number)
                phone_number, message, timestamp, media_url
            FROM chat_history
            WHERE ($1::date IS NULL OR timestamp::date = $1::date)
            ORDER BY phone_number, timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
            .bind(on_date)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            summaries.push(ConversationSummary {
                phone_number: row.try_get("phone_number")?,
                last_message: row.try_get::<Option<String>, _>("message")?.unwrap_or_default(),
                last_timestamp: row.try_get("timestamp")?,
                last_media_url: row.try_get("media_url")?,
            });
        }
        Ok(summaries)
    }

    async fn insert_message(&self, msg: &NewChatMessage) -> Result<i32, Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO chat_history (
                phone_number, role, message, timestamp, media_url, quoted_sid
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
            .bind(&msg.phone_number)
            .bind(msg.role.as_str())
            .bind(&msg.message)
            .bind(msg.timestamp)
            .bind(&msg.media_url)
            .bind(&msg.quoted_sid)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("id")?)
    }
}
