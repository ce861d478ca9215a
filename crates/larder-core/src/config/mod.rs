//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file plus `LARDER__`-prefixed environment variables.
//! Each sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::cache::CacheConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Relational store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session store / cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Credential, token, and role-policy settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional. Environment variables prefixed with `LARDER`
    /// override file values, using `__` between section and key
    /// (`LARDER__AUTH__SESSION_TTL_MS=3600000`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("LARDER")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.restricted_global_roles")
                    .with_list_parse_key("auth.restricted_group_roles")
                    .with_list_parse_key("auth.admin_roles")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
