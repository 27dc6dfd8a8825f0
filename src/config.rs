use std::env;
use std::str::FromStr;
use std::time::Duration;

use strum_macros::{Display, EnumString};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Which entity store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Mysql,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Required when `store_backend` is mysql
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub store_backend: StoreBackend,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub profile_retry_attempts: u32,
    pub profile_retry_delay_ms: u64,
}

impl AppConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let store_backend = parse_or("STORE_BACKEND", get("STORE_BACKEND"), StoreBackend::Mysql)?;
        let database_url = get("DATABASE_URL");
        if store_backend == StoreBackend::Mysql && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(AppConfig {
            database_url,
            jwt_secret,
            store_backend,
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("PORT", get("PORT"), 8000)?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: parse_or("LOG_FORMAT", get("LOG_FORMAT"), LogFormat::Json)?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 10)?,
            db_acquire_timeout_secs: parse_or("DB_ACQUIRE_TIMEOUT_SECS", get("DB_ACQUIRE_TIMEOUT_SECS"), 3)?,
            profile_retry_attempts: parse_or("PROFILE_RETRY_ATTEMPTS", get("PROFILE_RETRY_ATTEMPTS"), 3)?,
            profile_retry_delay_ms: parse_or("PROFILE_RETRY_DELAY_MS", get("PROFILE_RETRY_DELAY_MS"), 1000)?,
        })
    }

    pub fn profile_retry_delay(&self) -> Duration {
        Duration::from_millis(self.profile_retry_delay_ms)
    }
}

fn parse_or<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}
