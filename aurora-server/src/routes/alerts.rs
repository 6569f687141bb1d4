use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use aurora_core::render::{alert_card, AlertCard};
use aurora_core::utils::time::parse_date_filter;

use crate::error::ServerError;
use crate::routes::{session_id, DateQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub date: Option<NaiveDate>,
    pub alerts: Vec<AlertCard>,
    pub refresh_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub id: i32,
    pub resolved: bool,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct OpenAlertResponse {
    pub phone_number: String,
    pub alert: AlertCard,
}

pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<AlertListResponse>, ServerError> {
    let date = parse_date_filter(query.date.as_deref())?;
    let alerts = state.alerts.pending(date).await?;
    Ok(Json(AlertListResponse {
        date,
        alerts: alerts.iter().map(alert_card).collect(),
        refresh_secs: state.refresh_secs,
    }))
}

pub async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ResolveResponse>, ServerError> {
    state.alerts.resolve(id).await?;
    Ok(Json(ResolveResponse {
        id,
        resolved: true,
        status: "Marcado como respondido".to_string(),
    }))
}

/// Jump from an alert to its conversation: the next conversation list read
/// by this session carries the alert's phone number as `navigate_to`.
pub async fn open_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<OpenAlertResponse>, ServerError> {
    let session = session_id(&state, &headers)?;
    let alert = state.alerts.open(id).await?;
    if let Some(session) = session {
        state.sessions.with(session, |s| s.set_navigation(&alert.phone_number));
    }
    Ok(Json(OpenAlertResponse {
        phone_number: alert.phone_number.clone(),
        alert: alert_card(&alert),
    }))
}
