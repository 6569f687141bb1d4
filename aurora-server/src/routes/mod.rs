//! JSON controller for the operator console.
//!
//! Handlers are thin: parse input, call one service, render the result with
//! `aurora_core::render`, and map errors through [`ServerError`].

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use aurora_core::Error;

use crate::error::ServerError;
use crate::session::SESSION_HEADER;
use crate::state::AppState;

pub mod alerts;
pub mod conversations;
pub mod sessions;

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{id}", delete(sessions::close_session))
        .route("/conversations", get(conversations::list_conversations))
        .route("/conversations/{phone}", get(conversations::show_conversation))
        .route("/conversations/{phone}/draft", put(conversations::save_draft))
        .route("/conversations/{phone}/messages", post(conversations::send_text))
        .route(
            "/conversations/{phone}/images",
            post(conversations::send_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/{id}/resolve", post(alerts::resolve_alert))
        .route("/alerts/{id}/open", post(alerts::open_alert))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `?date=YYYY-MM-DD` on list views.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// Body for drafts and text replies.
#[derive(Debug, Deserialize, Serialize)]
pub struct TextBody {
    pub text: String,
}

/// The caller's session id, if they sent one. Unknown ids are a 404 so the
/// client knows to open a new session.
pub(crate) fn session_id(state: &AppState, headers: &HeaderMap) -> Result<Option<Uuid>, ServerError> {
    let Some(raw) = headers.get(SESSION_HEADER) else {
        return Ok(None);
    };
    let id = raw
        .to_str()
        .ok()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| Error::InvalidInput(format!("{SESSION_HEADER} is not a valid session id")))?;
    if state.sessions.with(id, |_| ()).is_none() {
        return Err(Error::NotFound(format!("session {id}")).into());
    }
    Ok(Some(id))
}
