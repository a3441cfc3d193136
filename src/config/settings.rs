//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::models::RegistrationSource;

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub credentials: CredentialConfig,
    pub notifications: NotificationConfig,
    pub scanner: ScannerConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when unset
    pub directory: Option<String>,
    pub json: bool,
}

/// Guest code generation and insert retry settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialConfig {
    pub import_prefix: String,
    pub online_prefix: String,
    pub manual_prefix: String,
    /// Attempts per registration when a generated code collides
    pub max_insert_attempts: u32,
}

/// Ticket notification queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub queue_capacity: usize,
    pub sender: String,
}

/// Door scanner configuration used by the binary
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub event_id: Option<i64>,
    pub gate: Option<String>,
    pub actor: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load settings from an explicit file, still honouring environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("GUESTPASS").separator("__")
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::GuestPassError> {
        super::validation::validate_settings(self)
    }
}

impl CredentialConfig {
    pub fn prefix_for(&self, source: RegistrationSource) -> &str {
        match source {
            RegistrationSource::BulkImport => &self.import_prefix,
            RegistrationSource::OnlineForm => &self.online_prefix,
            RegistrationSource::Manual => &self.manual_prefix,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/guestpass".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            json: false,
        }
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            import_prefix: "IMP".to_string(),
            online_prefix: "REG".to_string(),
            manual_prefix: "MAN".to_string(),
            max_insert_attempts: 2,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: 256,
            sender: "tickets@guestpass.local".to_string(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            event_id: None,
            gate: None,
            actor: "door-scanner".to_string(),
        }
    }
}
