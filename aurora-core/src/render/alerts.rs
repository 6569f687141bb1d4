use serde::Serialize;

use aurora_common::models::PendingAlert;
use crate::utils::time::timestamp_label;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertCard {
    pub id: i32,
    pub phone_number: String,
    /// `📞 <phone> – <name>`, with "Sin nombre" for anonymous customers.
    pub header: String,
    pub timestamp_label: String,
    pub message: String,
}

pub fn alert_card(alert: &PendingAlert) -> AlertCard {
    AlertCard {
        id: alert.id,
        phone_number: alert.phone_number.clone(),
        header: format!("📞 {} – {}", alert.phone_number, alert.display_name()),
        timestamp_label: timestamp_label(alert.created_at),
        message: alert.message.clone(),
    }
}
