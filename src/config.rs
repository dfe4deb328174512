use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub storage: StorageBackend,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    /// Access token lifetime in minutes.
    pub jwt_maxage: i64,
    /// Refresh token lifetime in minutes.
    pub jwt_refresh_maxage: i64,
    pub port: u16,
    pub frontend_url: String,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let storage = match std::env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>().map_err(|_| ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                value,
            })?,
            Err(_) => StorageBackend::Postgres,
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt_secret = required("JWT_SECRET_KEY")?;
        let jwt_refresh_secret = required("JWT_REFRESH_SECRET_KEY")?;
        let jwt_maxage = parsed_or("JWT_MAXAGE", 60 * 24)?;
        let jwt_refresh_maxage = parsed_or("JWT_REFRESH_MAXAGE", 60 * 24 * 10)?;
        let port = parsed_or("PORT", 8000)?;

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let log_level = parsed_or("LOG_LEVEL", LevelFilter::DEBUG)?;

        Ok(Config {
            database_url,
            storage,
            jwt_secret,
            jwt_refresh_secret,
            jwt_maxage,
            jwt_refresh_maxage,
            port,
            frontend_url,
            log_level,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
