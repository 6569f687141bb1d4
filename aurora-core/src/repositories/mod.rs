// src/repositories/mod.rs

pub mod postgres;
pub mod memory;

pub use aurora_common::traits::repository_traits::{AlertRepository, ChatHistoryRepository};
pub use memory::InMemoryDesk;
