//! Boundary handlers module
//!
//! Transport-agnostic entry points for the operations the engine exposes.
//! Each handler takes a JSON-shaped request, calls the services and returns an
//! [`ApiResponse`] that any HTTP or RPC layer can serialize as is:
//! - Registration handlers for guest intake
//! - Check-in handlers for verification and door admission
//! - Event handlers for the read-only event queries

pub mod check_in;
pub mod events;
pub mod registration;

// Re-export commonly used handler functions
pub use check_in::{handle_check_in, handle_resolve, CheckInRequest, CheckInResponse, ResolveRequest};
pub use events::{handle_attendance_summary, handle_form_schema};
pub use registration::{handle_register, RegisterRequest, RegisterResponse};

use serde::{Deserialize, Serialize};
use tracing::error;
use crate::utils::errors::{ErrorKind, FieldError, GuestPassError, Result};

/// Error body returned across the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl From<&GuestPassError> for ApiError {
    fn from(err: &GuestPassError) -> Self {
        let kind = err.kind();
        let message = if kind == ErrorKind::Internal {
            error!(error = %err, severity = %err.severity(), "Internal error at boundary");
            "Internal error, please retry".to_string()
        } else {
            err.to_string()
        };

        Self {
            kind,
            message,
            fields: err.field_errors().to_vec(),
        }
    }
}

/// Discriminated success/error result of a boundary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ApiResponse<T> {
    Ok { data: T },
    Error { error: ApiError },
}

impl<T> ApiResponse<T> {
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ApiResponse::Ok { .. } => None,
            ApiResponse::Error { error } => Some(error.kind),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ApiResponse::Ok { data } => Some(data),
            ApiResponse::Error { .. } => None,
        }
    }
}

impl<T> From<Result<T>> for ApiResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::Ok { data },
            Err(e) => ApiResponse::Error { error: ApiError::from(&e) },
        }
    }
}
