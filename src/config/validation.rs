//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use std::collections::HashSet;
use crate::utils::errors::{GuestPassError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;
    validate_credential_config(&settings.credentials)?;
    validate_notification_config(&settings.notifications)?;
    validate_scanner_config(&settings.scanner)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseSettings) -> Result<()> {
    if config.url.is_empty() {
        return Err(GuestPassError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(GuestPassError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(GuestPassError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GuestPassError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(GuestPassError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate guest code settings. Prefixes end up inside QR codes and URLs.
fn validate_credential_config(config: &super::CredentialConfig) -> Result<()> {
    let prefixes = [&config.import_prefix, &config.online_prefix, &config.manual_prefix];

    for prefix in prefixes {
        let valid = (1..=8).contains(&prefix.len())
            && prefix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !valid {
            return Err(GuestPassError::Config(
                format!("Invalid guest code prefix: {:?} (1-8 uppercase letters or digits)", prefix)
            ));
        }
    }

    let distinct: HashSet<_> = prefixes.iter().collect();
    if distinct.len() != prefixes.len() {
        return Err(GuestPassError::Config(
            "Guest code prefixes must differ per registration source".to_string()
        ));
    }

    if config.max_insert_attempts == 0 {
        return Err(GuestPassError::Config(
            "Max insert attempts must be at least 1".to_string()
        ));
    }

    Ok(())
}

/// Validate notification configuration
fn validate_notification_config(config: &super::NotificationConfig) -> Result<()> {
    if config.enabled && config.queue_capacity == 0 {
        return Err(GuestPassError::Config(
            "Notification queue capacity must be greater than 0".to_string()
        ));
    }

    if config.enabled && !config.sender.contains('@') {
        return Err(GuestPassError::Config(
            format!("Notification sender is not an email address: {}", config.sender)
        ));
    }

    Ok(())
}

/// Validate scanner configuration
fn validate_scanner_config(config: &super::ScannerConfig) -> Result<()> {
    if config.actor.trim().is_empty() {
        return Err(GuestPassError::Config(
            "Scanner actor is required".to_string()
        ));
    }

    Ok(())
}
