//! Runtime configuration, read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.

use std::net::SocketAddr;

use thiserror::Error;

use cannareg_observability::LogFormat;
use cannareg_products::ValidationMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Postgres instead of the in-memory store.
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub write_validation_mode: ValidationMode,
    pub seed_sample_data: bool,
    pub log_format: LogFormat,
    /// Comma-separated origins; unset means permissive CORS.
    pub cors_allowed_origins: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            use_persistent_stores: false,
            database_url: None,
            db_max_connections: 5,
            write_validation_mode: ValidationMode::Supplied,
            seed_sample_data: false,
            log_format: LogFormat::Json,
            cors_allowed_origins: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset and blank values take the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Config::default();

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| invalid("BIND_ADDR", e))?,
            None => defaults.bind_addr,
        };

        let use_persistent_stores = match get("USE_PERSISTENT_STORES") {
            Some(raw) => parse_bool("USE_PERSISTENT_STORES", &raw)?,
            None => defaults.use_persistent_stores,
        };

        let database_url = get("DATABASE_URL");
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar("DATABASE_URL"));
        }

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(0) => return Err(invalid("DB_MAX_CONNECTIONS", "must be at least 1")),
                Ok(n) => n,
                Err(e) => return Err(invalid("DB_MAX_CONNECTIONS", e)),
            },
            None => defaults.db_max_connections,
        };

        let write_validation_mode = match get("WRITE_VALIDATION_MODE") {
            Some(raw) => raw
                .parse::<ValidationMode>()
                .map_err(|e| invalid("WRITE_VALIDATION_MODE", e))?,
            None => defaults.write_validation_mode,
        };

        let seed_sample_data = match get("SEED_SAMPLE_DATA") {
            Some(raw) => parse_bool("SEED_SAMPLE_DATA", &raw)?,
            None => defaults.seed_sample_data,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| invalid("LOG_FORMAT", e))?,
            None => defaults.log_format,
        };

        Ok(Self {
            bind_addr,
            use_persistent_stores,
            database_url,
            db_max_connections,
            write_validation_mode,
            seed_sample_data,
            log_format,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        })
    }
}

fn invalid(var: &'static str, err: impl core::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        message: err.to_string(),
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
    }
}
