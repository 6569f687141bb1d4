// ================================================================
// File: aurora-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The provider answered, but refused the request.
    #[error("{provider} rejected the request (status {status}{}): {message}",
        .code.map(|c| format!(", code {c}")).unwrap_or_default())]
    Provider {
        provider: &'static str,
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// What the operator is told went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Database or provider unreachable.
    Connectivity,
    /// Invalid recipient, auth failure, payload rejected.
    ProviderRejection,
    /// A credential or key is absent.
    MissingConfiguration,
    NotFound,
    InvalidInput,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Provider { .. } => ErrorKind::ProviderRejection,
            Error::Config(_) => ErrorKind::MissingConfiguration,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Http(e) => {
                if e.is_status() {
                    ErrorKind::ProviderRejection
                } else if e.is_decode() {
                    ErrorKind::Internal
                } else {
                    ErrorKind::Connectivity
                }
            }
            Error::Database(e) => match e {
                sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Configuration(_) => ErrorKind::Connectivity,
                sqlx::Error::RowNotFound => ErrorKind::NotFound,
                _ => ErrorKind::Internal,
            },
            Error::Io(_) => ErrorKind::Connectivity,
            Error::Json(_) | Error::Migration(_) | Error::Parse(_) => ErrorKind::Internal,
        }
    }

    /// Single line suitable for showing to the operator.
    pub fn operator_message(&self) -> String {
        let text = self.to_string();
        let line = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        match self.kind() {
            ErrorKind::Connectivity => format!("Connection problem: {line}"),
            ErrorKind::MissingConfiguration => format!("Missing configuration: {line}"),
            _ => line,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<chrono::format::ParseError> for Error {
    fn from(err: chrono::format::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}
