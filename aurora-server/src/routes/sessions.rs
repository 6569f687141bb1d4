use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use aurora_core::Error;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

pub async fn create_session(State(state): State<Arc<AppState>>) -> Json<SessionCreated> {
    let session_id = state.sessions.create();
    debug!(%session_id, open = state.sessions.len(), "operator session opened");
    Json(SessionCreated { session_id })
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    if !state.sessions.remove(session_id) {
        return Err(Error::NotFound(format!("session {session_id}")).into());
    }
    debug!(%session_id, open = state.sessions.len(), "operator session closed");
    Ok(StatusCode::NO_CONTENT)
}
