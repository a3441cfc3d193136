//! Verification and check-in handlers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::models::Guest;
use crate::services::{CheckInOutcome, ServiceFactory};
use super::ApiResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub guest_code: String,
    pub event_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub guest_code: String,
    pub event_id: i64,
    pub actor: String,
    #[serde(default)]
    pub gate: Option<String>,
}

/// Check-in result; a repeat scan is a regular outcome, not an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CheckInResponse {
    #[serde(rename_all = "camelCase")]
    CheckedIn { guest: Guest },
    #[serde(rename_all = "camelCase")]
    AlreadyCheckedIn {
        checked_in_at: Option<DateTime<Utc>>,
        checked_in_by: Option<String>,
        check_in_gate: Option<String>,
        guest: Guest,
    },
}

impl From<CheckInOutcome> for CheckInResponse {
    fn from(outcome: CheckInOutcome) -> Self {
        match outcome {
            CheckInOutcome::CheckedIn(guest) => CheckInResponse::CheckedIn { guest },
            CheckInOutcome::AlreadyCheckedIn(guest) => CheckInResponse::AlreadyCheckedIn {
                checked_in_at: guest.checked_in_at,
                checked_in_by: guest.checked_in_by.clone(),
                check_in_gate: guest.check_in_gate.clone(),
                guest,
            },
        }
    }
}

/// Handle `resolve(guestCode, eventId)`
pub async fn handle_resolve(services: &ServiceFactory, request: ResolveRequest) -> ApiResponse<Guest> {
    debug!(event_id = request.event_id, guest_code = %request.guest_code, "Handling resolve request");
    services
        .check_in
        .resolve(&request.guest_code, request.event_id)
        .await
        .into()
}

/// Handle `checkIn(guestCode, eventId, actor, gate?)`
pub async fn handle_check_in(services: &ServiceFactory, request: CheckInRequest) -> ApiResponse<CheckInResponse> {
    debug!(event_id = request.event_id, guest_code = %request.guest_code, "Handling check-in request");
    services
        .check_in
        .check_in(&request.guest_code, request.event_id, &request.actor, request.gate.as_deref())
        .await
        .map(CheckInResponse::from)
        .into()
}
