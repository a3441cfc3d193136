//! Read-only event handlers

use crate::models::{AttendanceSummary, FormSchema};
use crate::services::ServiceFactory;
use crate::utils::errors::GuestPassError;
use super::ApiResponse;

/// Current intake form of an event, as a registration page would render it
pub async fn handle_form_schema(services: &ServiceFactory, event_id: i64) -> ApiResponse<FormSchema> {
    services
        .store()
        .form_schema(event_id)
        .await
        .and_then(|schema| schema.ok_or(GuestPassError::EventNotFound { event_id }))
        .into()
}

/// Registered and attended counts for an event
pub async fn handle_attendance_summary(services: &ServiceFactory, event_id: i64) -> ApiResponse<AttendanceSummary> {
    services.check_in.attendance_summary(event_id).await.into()
}
