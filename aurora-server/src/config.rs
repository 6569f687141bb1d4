//! Desk configuration, loaded from environment variables at startup.
//!
//! Provider credentials are optional here: the console starts without them
//! and the send that needs one fails with a configuration error. Database
//! settings are checked when a database connection is actually requested.

use aurora_core::platforms::{ImgbbSettings, TwilioSettings};
use aurora_core::platforms::imgbb::DEFAULT_IMGBB_API_BASE;
use aurora_core::platforms::twilio::DEFAULT_TWILIO_API_BASE;
use aurora_core::{DatabaseSettings, Error};

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_PG_PORT: u16 = 5432;
pub const DEFAULT_REFRESH_SECS: u64 = 30;
pub const DEFAULT_CHATS_TTL_SECS: i64 = aurora_core::cache::DEFAULT_RECENT_CHATS_TTL_SECS;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 1;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub twilio: TwilioSettings,
    pub imgbb: ImgbbSettings,
    database: Option<DatabaseSettings>,
    missing_database_vars: Vec<&'static str>,
    pub bind_address: String,
    /// How often clients should re-poll list views.
    pub refresh_secs: u64,
    pub recent_chats_ttl_secs: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let twilio = TwilioSettings {
            account_sid: get("TWILIO_ACCOUNT_SID"),
            auth_token: get("TWILIO_AUTH_TOKEN"),
            from_number: get("TWILIO_NUMBER"),
            api_base: get("TWILIO_API_BASE").unwrap_or_else(|| DEFAULT_TWILIO_API_BASE.to_string()),
        };
        let imgbb = ImgbbSettings {
            api_key: get("IMGBB_API_KEY"),
            api_base: get("IMGBB_API_BASE").unwrap_or_else(|| DEFAULT_IMGBB_API_BASE.to_string()),
        };

        let port = parse_or("PG_PORT", get("PG_PORT"), DEFAULT_PG_PORT)?;
        let max_connections = parse_or(
            "AURORA_DB_MAX_CONNECTIONS",
            get("AURORA_DB_MAX_CONNECTIONS"),
            DEFAULT_DB_MAX_CONNECTIONS,
        )?;

        let mut missing_database_vars = Vec::new();
        let mut require = |key: &'static str| {
            let value = get(key);
            if value.is_none() {
                missing_database_vars.push(key);
            }
            value
        };
        let host = require("PG_HOST");
        let database = require("PG_DB");
        let user = require("PG_USER");
        let password = require("PG_PASSWORD");

        let database = match (host, database, user, password) {
            (Some(host), Some(database), Some(user), Some(password)) => Some(DatabaseSettings {
                host,
                database,
                user,
                password,
                port,
                max_connections,
            }),
            _ => None,
        };

        Ok(Self {
            twilio,
            imgbb,
            database,
            missing_database_vars,
            bind_address: get("AURORA_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            refresh_secs: parse_or("AURORA_REFRESH_SECS", get("AURORA_REFRESH_SECS"), DEFAULT_REFRESH_SECS)?,
            recent_chats_ttl_secs: parse_or(
                "AURORA_CHATS_TTL_SECS",
                get("AURORA_CHATS_TTL_SECS"),
                DEFAULT_CHATS_TTL_SECS,
            )?,
        })
    }

    /// Database settings, or a configuration error naming what is missing.
    pub fn database(&self) -> Result<&DatabaseSettings, Error> {
        self.database.as_ref().ok_or_else(|| {
            Error::Config(format!("{} not set", self.missing_database_vars.join(", ")))
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, Error> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| Error::Config(format!("{key} has an invalid value '{v}'"))),
    }
}
