//! Configuration for the Arete evaluation system
//!
//! Layers an optional config file with `ARETE_*` environment variables.
//! The remote database auth token is only ever read from configuration or
//! the environment; no credential table exists in this crate.

use crate::error::{AreteError, Result};
use crate::storage::libsql::ConnectionMode;
use serde::Deserialize;

/// Environment variable holding the remote database auth token
pub const DB_AUTH_TOKEN_VAR: &str = "ARETE_DB_AUTH_TOKEN";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AreteConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
}

/// Database connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// ":memory:", a local file path, or a libsql:// remote URL
    pub url: String,

    /// Auth token for remote databases; the ARETE_DB_AUTH_TOKEN
    /// environment variable takes precedence
    pub auth_token: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "arete.db".to_string(),
            auth_token: None,
        }
    }
}

/// Read-cache settings; short TTLs, invalidated on every write
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub worker_ttl_secs: u64,
    pub report_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            worker_ttl_secs: 60,
            report_ttl_secs: 60,
        }
    }
}

impl AreteConfig {
    /// Load configuration from an optional file plus ARETE_* environment
    /// variables (e.g. ARETE_DATABASE__URL overrides database.url)
    pub fn load(path: Option<&str>) -> Result<Self> {
        let builder = match path {
            Some(p) => config::Config::builder().add_source(config::File::with_name(p)),
            None => config::Config::builder()
                .add_source(config::File::with_name("arete").required(false)),
        };

        let settings = builder
            .add_source(config::Environment::with_prefix("ARETE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Resolve the configured database URL into a connection mode
    ///
    /// Remote URLs require an auth token from the environment or the
    /// config file; the environment wins.
    pub fn connection_mode(&self) -> Result<ConnectionMode> {
        let url = self.database.url.as_str();

        if url == ":memory:" {
            return Ok(ConnectionMode::InMemory);
        }

        if url.starts_with("libsql://") {
            let token = std::env::var(DB_AUTH_TOKEN_VAR)
                .ok()
                .filter(|t| !t.is_empty())
                .or_else(|| self.database.auth_token.clone())
                .ok_or_else(|| {
                    AreteError::Config(config::ConfigError::Message(format!(
                        "remote database requires {} or database.auth_token",
                        DB_AUTH_TOKEN_VAR
                    )))
                })?;
            return Ok(ConnectionMode::Remote {
                url: url.to_string(),
                token,
            });
        }

        Ok(ConnectionMode::Local(url.to_string()))
    }
}
