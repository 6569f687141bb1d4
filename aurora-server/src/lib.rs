// aurora-server/src/lib.rs

pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod routes;
pub mod commands;

pub use config::AppConfig;
pub use error::ServerError;
pub use state::AppState;
