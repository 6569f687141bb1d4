// File: aurora-core/src/test_utils/helpers.rs

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use aurora_common::models::{ChatMessage, PendingAlert, Role};
use crate::db::Database;
use crate::Error;

/// `TEST_DATABASE_URL`, if the environment provides one.
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok().filter(|u| !u.trim().is_empty())
}

/// Create a connection pool to the test DB.
pub async fn create_test_db_pool(url: &str) -> Result<Pool<Postgres>, Error> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await?;
    Ok(pool)
}

/// Wipes out test data so each test can start fresh.
pub async fn clean_database(pool: &Pool<Postgres>) -> Result<(), Error> {
    sqlx::query(r#"
        TRUNCATE TABLE
            chat_history,
            alertas_pendientes
        RESTART IDENTITY;
    "#)
        .execute(pool)
        .await?;

    Ok(())
}

/// A migrated, empty test database, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn setup_test_database() -> Result<Option<Database>, Error> {
    let Some(url) = test_database_url() else {
        return Ok(None);
    };
    let pool = create_test_db_pool(&url).await?;
    let db = Database::from_pool(pool);
    db.migrate().await?;
    clean_database(db.pool()).await?;
    Ok(Some(db))
}

/// Insert a raw `chat_history` row (as the webhook would) and return its id.
pub async fn seed_chat_row(
    pool: &Pool<Postgres>,
    phone_number: &str,
    role: Role,
    message: &str,
    timestamp: NaiveDateTime,
    quoted_sid: Option<&str>,
) -> Result<i32, Error> {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO chat_history (phone_number, role, message, timestamp, quoted_sid)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
        .bind(phone_number)
        .bind(role.as_str())
        .bind(message)
        .bind(timestamp)
        .bind(quoted_sid)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

/// Insert a raw `alertas_pendientes` row (as the classifier would).
pub async fn seed_alert_row(
    pool: &Pool<Postgres>,
    phone_number: &str,
    nombre: Option<&str>,
    mensaje: &str,
    fecha: NaiveDateTime,
) -> Result<i32, Error> {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO alertas_pendientes (phone_number, nombre, mensaje, fecha)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
        .bind(phone_number)
        .bind(nombre)
        .bind(mensaje)
        .bind(fecha)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}

pub fn chat_message(
    id: i32,
    phone_number: &str,
    role: Role,
    message: &str,
    timestamp: NaiveDateTime,
) -> ChatMessage {
    ChatMessage {
        id,
        phone_number: phone_number.to_string(),
        role,
        message: message.to_string(),
        timestamp,
        media_url: None,
        quoted_sid: None,
    }
}

pub fn pending_alert(
    id: i32,
    phone_number: &str,
    customer_name: Option<&str>,
    created_at: NaiveDateTime,
) -> PendingAlert {
    PendingAlert {
        id,
        phone_number: phone_number.to_string(),
        customer_name: customer_name.map(|s| s.to_string()),
        message: format!("alerta {id}"),
        created_at,
        resolved: false,
    }
}
