// File: aurora-core/src/services/alert_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use aurora_common::models::PendingAlert;
use aurora_common::traits::repository_traits::AlertRepository;
use crate::Error;

pub struct AlertService {
    alerts: Arc<dyn AlertRepository>,
}

impl AlertService {
    pub fn new(alerts: Arc<dyn AlertRepository>) -> Self {
        Self { alerts }
    }

    /// Unresolved alerts, newest first.
    pub async fn pending(&self, on_date: Option<NaiveDate>) -> Result<Vec<PendingAlert>, Error> {
        self.alerts.list_unresolved(on_date).await
    }

    /// Mark an alert as answered. Safe to repeat.
    pub async fn resolve(&self, alert_id: i32) -> Result<(), Error> {
        self.alerts.mark_resolved(alert_id).await?;
        info!(alert_id, "alert marked as answered");
        Ok(())
    }

    /// Look up an alert so the operator can jump to its conversation.
    pub async fn open(&self, alert_id: i32) -> Result<PendingAlert, Error> {
        self.alerts
            .get_alert(alert_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("alert {alert_id}")))
    }
}
