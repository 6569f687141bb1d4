//! HTTP mapping of desk errors.
//!
//! Every handler returns `Result<T, ServerError>`; the error becomes a JSON
//! body carrying the one-line operator message and its kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use aurora_core::{Error, ErrorKind};

#[derive(Debug)]
pub struct ServerError(pub Error);

impl From<Error> for ServerError {
    fn from(e: Error) -> Self {
        ServerError(e)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Connectivity => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::ProviderRejection => StatusCode::BAD_GATEWAY,
        ErrorKind::MissingConfiguration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            error!(error = %self.0, ?kind, "request failed");
        } else {
            warn!(error = %self.0, ?kind, "request rejected");
        }
        let body = json!({
            "error": self.0.operator_message(),
            "kind": kind,
        });
        (status, Json(body)).into_response()
    }
}
