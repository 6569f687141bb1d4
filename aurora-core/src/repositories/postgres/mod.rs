// src/repositories/postgres/mod.rs

pub mod chat_history;
pub mod alerts;

pub use chat_history::PostgresChatHistoryRepository;
pub use alerts::PostgresAlertRepository;
