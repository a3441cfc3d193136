//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the guest lifecycle engine.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::models::Guest;
use crate::utils::errors::{GuestPassError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer when dropped and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| GuestPassError::Config(format!("Invalid log filter: {}", e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "guestpass.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| GuestPassError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a successful registration
pub fn log_registration(guest: &Guest) {
    info!(
        event_id = guest.event_id,
        guest_id = guest.id,
        guest_code = %guest.guest_code,
        source = guest.registration_source.as_str(),
        "Guest registered"
    );
}

/// Log a refused registration with the reason it was refused
pub fn log_rejected_registration(event_id: i64, error: &GuestPassError) {
    warn!(
        event_id = event_id,
        kind = ?error.kind(),
        severity = %error.severity(),
        retryable = error.is_recoverable(),
        error = %error,
        "Registration rejected"
    );
}

/// Log a completed check-in
pub fn log_check_in(guest: &Guest, actor: &str) {
    info!(
        event_id = guest.event_id,
        guest_code = %guest.guest_code,
        actor = actor,
        gate = guest.check_in_gate.as_deref(),
        "Guest checked in"
    );
}

/// Log a repeated scan of a guest who is already inside
pub fn log_repeat_scan(guest: &Guest, actor: &str) {
    warn!(
        event_id = guest.event_id,
        guest_code = %guest.guest_code,
        actor = actor,
        first_checked_in_by = guest.checked_in_by.as_deref(),
        "Guest already checked in"
    );
}

/// Log storage operations
pub fn log_store_retry(operation: &str, attempt: u32, reason: &str) {
    debug!(
        operation = operation,
        attempt = attempt,
        reason = reason,
        "Retrying store operation"
    );
}
