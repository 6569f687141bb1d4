use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::extract::multipart::MultipartError;
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use aurora_core::render::{chat_list_item, ChatListItem, ThreadView};
use aurora_core::services::SentMessage;
use aurora_core::utils::time::parse_date_filter;
use aurora_core::Error;

use crate::error::ServerError;
use crate::routes::{session_id, DateQuery, TextBody};
use crate::session::SESSION_HEADER;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub date: Option<NaiveDate>,
    pub conversations: Vec<ChatListItem>,
    /// Conversation to open next, set by opening an alert. Delivered once.
    pub navigate_to: Option<String>,
    pub refresh_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub thread: ThreadView,
    pub draft: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub sid: String,
    pub message_id: i32,
    pub media_url: Option<String>,
    pub status: String,
}

impl From<SentMessage> for SendResponse {
    fn from(sent: SentMessage) -> Self {
        Self {
            status: format!("✅ Enviado correctamente (SID: {})", sent.sid),
            sid: sent.sid,
            message_id: sent.message_id,
            media_url: sent.media_url,
        }
    }
}

pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DateQuery>,
) -> Result<Json<ConversationListResponse>, ServerError> {
    let session = session_id(&state, &headers)?;
    let date = parse_date_filter(query.date.as_deref())?;
    let rows = state.conversations.recent_conversations(date).await?;
    let navigate_to = session.and_then(|id| state.sessions.with(id, |s| s.take_navigation()).flatten());

    Ok(Json(ConversationListResponse {
        date,
        conversations: rows.iter().map(chat_list_item).collect(),
        navigate_to,
        refresh_secs: state.refresh_secs,
    }))
}

pub async fn show_conversation(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ConversationResponse>, ServerError> {
    let session = session_id(&state, &headers)?;
    let thread = state.conversations.thread(&phone).await?;
    let draft = session.and_then(|id| {
        state
            .sessions
            .with(id, |s| s.draft(&phone).map(str::to_string))
            .flatten()
    });
    Ok(Json(ConversationResponse { thread, draft }))
}

pub async fn save_draft(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
    headers: HeaderMap,
    Json(body): Json<TextBody>,
) -> Result<Json<TextBody>, ServerError> {
    let session = session_id(&state, &headers)?
        .ok_or_else(|| Error::InvalidInput(format!("{SESSION_HEADER} header is required")))?;
    state.sessions.with(session, |s| s.save_draft(&phone, &body.text));
    Ok(Json(body))
}

/// Send a text reply. A failed send keeps the text as the session's draft.
pub async fn send_text(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
    headers: HeaderMap,
    Json(body): Json<TextBody>,
) -> Result<Json<SendResponse>, ServerError> {
    let session = session_id(&state, &headers)?;
    match state.dispatch.send_text(&phone, &body.text).await {
        Ok(sent) => {
            state.conversations.invalidate_recent();
            if let Some(id) = session {
                state.sessions.with(id, |s| s.clear_draft(&phone));
            }
            Ok(Json(sent.into()))
        }
        Err(e) => {
            if let Some(id) = session {
                state.sessions.with(id, |s| s.save_draft(&phone, &body.text));
            }
            Err(e.into())
        }
    }
}

fn bad_multipart(e: MultipartError) -> ServerError {
    Error::InvalidInput(format!("malformed upload: {}", e.body_text())).into()
}

/// Send an image reply from a `multipart/form-data` body with an `image`
/// file field and an optional `caption` text field.
pub async fn send_image(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<SendResponse>, ServerError> {
    let mut image: Option<Vec<u8>> = None;
    let mut caption: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => image = Some(field.bytes().await.map_err(bad_multipart)?.to_vec()),
            "caption" => caption = Some(field.text().await.map_err(bad_multipart)?),
            other => debug!(field = other, "ignoring upload field"),
        }
    }

    let image = image.ok_or_else(|| Error::InvalidInput("upload has no 'image' field".into()))?;
    let sent = state
        .dispatch
        .send_image(&phone, &image, caption.as_deref())
        .await?;
    state.conversations.invalidate_recent();
    Ok(Json(sent.into()))
}
