// src/repositories/postgres/alerts.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use aurora_common::models::PendingAlert;
use aurora_common::traits::repository_traits::AlertRepository;
use crate::Error;

#[derive(Clone)]
pub struct PostgresAlertRepository {
    pool: Pool<Postgres>,
}

impl PostgresAlertRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn alert_from_row(row: &PgRow) -> Result<PendingAlert, Error> {
    Ok(PendingAlert {
        id: row.try_get("id")?,
        phone_number: row.try_get("phone_number")?,
        customer_name: row.try_get("nombre")?,
        message: row.try_get::<Option<String>, _>("mensaje")?.unwrap_or_default(),
        created_at: row.try_get("fecha")?,
        resolved: row.try_get("respondido")?,
    })
}

#[async_trait]
impl AlertRepository for PostgresAlertRepository {
    async fn list_unresolved(&self, on_date: Option<NaiveDate>) -> Result<Vec<PendingAlert>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, phone_number, nombre, mensaje, fecha, respondido
            FROM alertas_pendientes
            WHERE respondido = FALSE
              AND ($1::date IS NULL OR fecha::date = $1::date)
            ORDER BY fecha DESC, id DESC
            "#,
        )
            .bind(on_date)
            .fetch_all(&self.pool)
            .await?;

        let mut alerts = Vec::with_capacity(rows.len());
        for row in rows {
            alerts.push(alert_from_row(&row)?);
        }
        Ok(alerts)
    }

    async fn get_alert(&self, alert_id: i32) -> Result<Option<PendingAlert>, Error> {
        let row = sqlx::query(
            r#"
            SELECT id, phone_number, nombre, mensaje, fecha, respondido
            FROM alertas_pendientes
            WHERE id = $1
            "#,
        )
            .bind(alert_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(alert_from_row).transpose()
    }

    async fn mark_resolved(&self, alert_id: i32) -> Result<(), Error> {
        let result = sqlx::query(
            r#"
            UPDATE alertas_pendientes
            SET respondido = TRUE
            WHERE id = $1
            "#,
        )
            .bind(alert_id)
            .execute(&self.pool)
            .await?;

        debug!(alert_id, rows = result.rows_affected(), "marked alert resolved");
        Ok(())
    }
}
