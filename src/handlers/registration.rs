//! Registration handlers

use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::models::{GuestFields, RegistrationSource};
use crate::services::{FieldSubmission, RegistrationRequest, ServiceFactory};
use super::ApiResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub event_id: i64,
    #[serde(default)]
    pub fields: FieldSubmission,
    /// Defaults to the public online form
    #[serde(default)]
    pub source: Option<RegistrationSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub guest_code: String,
    pub qr_payload: String,
    pub normalized_fields: GuestFields,
}

/// Handle `register(eventId, fields)`
pub async fn handle_register(services: &ServiceFactory, request: RegisterRequest) -> ApiResponse<RegisterResponse> {
    debug!(event_id = request.event_id, "Handling register request");

    let registration = RegistrationRequest {
        fields: request.fields,
        source: request.source.unwrap_or(RegistrationSource::OnlineForm),
    };

    services
        .registration
        .register(request.event_id, registration)
        .await
        .map(|guest| RegisterResponse {
            guest_code: guest.guest_code,
            qr_payload: guest.qr_payload,
            normalized_fields: guest.fields,
        })
        .into()
}
