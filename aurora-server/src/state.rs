// aurora-server/src/state.rs

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use aurora_common::traits::repository_traits::{AlertRepository, ChatHistoryRepository};
use aurora_core::http::{DefaultHttpClient, HttpClient};
use aurora_core::platforms::{ImgbbHost, TwilioMessenger};
use aurora_core::repositories::postgres::{PostgresAlertRepository, PostgresChatHistoryRepository};
use aurora_core::repositories::InMemoryDesk;
use aurora_core::services::{AlertService, ConversationService, DispatchService};
use aurora_core::{Database, Error};

use crate::config::AppConfig;
use crate::session::SessionStore;

/// Everything a request handler or terminal command needs.
pub struct AppState {
    pub conversations: ConversationService,
    pub dispatch: DispatchService,
    pub alerts: AlertService,
    pub sessions: SessionStore,
    pub refresh_secs: u64,
}

impl AppState {
    pub fn new(
        history: Arc<dyn ChatHistoryRepository>,
        alerts: Arc<dyn AlertRepository>,
        config: &AppConfig,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        let messenger = Arc::new(TwilioMessenger::new(config.twilio.clone(), http.clone()));
        let images = Arc::new(ImgbbHost::new(config.imgbb.clone(), http));
        Self {
            conversations: ConversationService::new(
                history.clone(),
                Duration::seconds(config.recent_chats_ttl_secs.max(0)),
            ),
            dispatch: DispatchService::new(messenger, images, history),
            alerts: AlertService::new(alerts),
            sessions: SessionStore::new(),
            refresh_secs: config.refresh_secs,
        }
    }

    /// State backed by the configured Postgres database.
    pub async fn connect(config: &AppConfig) -> Result<Self, Error> {
        let db = Database::connect(config.database()?).await?;
        Ok(Self::with_database(&db, config))
    }

    pub fn with_database(db: &Database, config: &AppConfig) -> Self {
        let history = Arc::new(PostgresChatHistoryRepository::new(db.pool().clone()));
        let alerts = Arc::new(PostgresAlertRepository::new(db.pool().clone()));
        Self::new(history, alerts, config, Arc::new(DefaultHttpClient::new()))
    }

    /// State over a process-local store; nothing survives a restart.
    pub fn in_memory(config: &AppConfig) -> Self {
        info!("Using in-memory store; data is not persisted.");
        let desk = Arc::new(InMemoryDesk::new());
        Self::new(desk.clone(), desk, config, Arc::new(DefaultHttpClient::new()))
    }
}
