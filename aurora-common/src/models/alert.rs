use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of `alertas_pendientes`: a customer asked to reserve an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAlert {
    pub id: i32,
    pub phone_number: String,
    pub customer_name: Option<String>,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub resolved: bool,
}

impl PendingAlert {
    pub fn display_name(&self) -> &str {
        match self.customer_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "Sin nombre",
        }
    }
}
