//! Error handling for GuestPass
//!
//! This module defines the main error types used throughout the engine
//! and provides a unified error handling strategy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main error type for GuestPass
#[derive(Error, Debug)]
pub enum GuestPassError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Guest not found: {guest_code}")]
    GuestNotFound { guest_code: String },

    #[error("Registration is closed for event {event_id}")]
    RegistrationClosed { event_id: i64 },

    #[error("Event {event_id} is full (capacity {capacity})")]
    CapacityExceeded { event_id: i64, capacity: i32 },

    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("{email} is already registered for event {event_id}")]
    DuplicateRegistration { event_id: i64, email: String },

    #[error("Guest {guest_code} belongs to event {actual}, not event {expected}")]
    EventMismatch { guest_code: String, expected: i64, actual: i64 },

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Storage conflict: {0}")]
    StorageConflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for GuestPassError {
    fn from(err: config::ConfigError) -> Self {
        GuestPassError::Config(err.to_string())
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for GuestPass operations
pub type Result<T> = std::result::Result<T, GuestPassError>;

/// Error kinds exposed across the external boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    NotFound,
    RegistrationClosed,
    CapacityExceeded,
    ValidationError,
    DuplicateRegistration,
    EventMismatch,
    InvalidInput,
    Internal,
}

impl GuestPassError {
    /// Boundary kind for this error. Storage and infrastructure failures
    /// all collapse into `Internal`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GuestPassError::EventNotFound { .. } => ErrorKind::NotFound,
            GuestPassError::GuestNotFound { .. } => ErrorKind::NotFound,
            GuestPassError::RegistrationClosed { .. } => ErrorKind::RegistrationClosed,
            GuestPassError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            GuestPassError::Validation(_) => ErrorKind::ValidationError,
            GuestPassError::DuplicateRegistration { .. } => ErrorKind::DuplicateRegistration,
            GuestPassError::EventMismatch { .. } => ErrorKind::EventMismatch,
            GuestPassError::InvalidCredential(_) => ErrorKind::InvalidInput,
            GuestPassError::InvalidInput(_) => ErrorKind::InvalidInput,
            GuestPassError::Database(_)
            | GuestPassError::Migration(_)
            | GuestPassError::Config(_)
            | GuestPassError::StorageConflict(_)
            | GuestPassError::Serialization(_)
            | GuestPassError::Io(_) => ErrorKind::Internal,
        }
    }

    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            GuestPassError::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            GuestPassError::Database(_) => false,
            GuestPassError::Migration(_) => false,
            GuestPassError::Config(_) => false,
            GuestPassError::EventNotFound { .. } => false,
            GuestPassError::GuestNotFound { .. } => false,
            GuestPassError::RegistrationClosed { .. } => false,
            GuestPassError::CapacityExceeded { .. } => false,
            GuestPassError::Validation(_) => false,
            GuestPassError::DuplicateRegistration { .. } => false,
            GuestPassError::EventMismatch { .. } => false,
            GuestPassError::InvalidCredential(_) => false,
            GuestPassError::StorageConflict(_) => true,
            GuestPassError::Serialization(_) => false,
            GuestPassError::Io(_) => true,
            GuestPassError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GuestPassError::Database(_) => ErrorSeverity::Critical,
            GuestPassError::Migration(_) => ErrorSeverity::Critical,
            GuestPassError::Config(_) => ErrorSeverity::Critical,
            GuestPassError::StorageConflict(_) => ErrorSeverity::Error,
            GuestPassError::EventMismatch { .. } => ErrorSeverity::Warning,
            GuestPassError::InvalidCredential(_) => ErrorSeverity::Warning,
            GuestPassError::Serialization(_) | GuestPassError::Io(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
