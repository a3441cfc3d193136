//! Storage boundary used by the guest lifecycle services
//!
//! Every write that depends on a prior read (capacity, duplicate email, check-in)
//! is a single store call with its precondition evaluated atomically inside it.

use async_trait::async_trait;
use crate::models::{AttendanceSummary, CapacityState, CheckInRecord, Event, FormSchema, Guest, NewGuest};
use crate::utils::errors::Result;

/// Result of a conditional guest insert
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Inserted(Guest),
    /// The event already holds `capacity` guests
    CapacityReached { capacity: i32 },
    /// Another guest of the same event registered this email first
    DuplicateEmail,
    /// The generated guest code is already taken
    DuplicateCode,
}

#[async_trait]
pub trait GuestStore: Send + Sync {
    async fn find_event(&self, event_id: i64) -> Result<Option<Event>>;

    /// Current form schema of an event
    async fn form_schema(&self, event_id: i64) -> Result<Option<FormSchema>> {
        Ok(self.find_event(event_id).await?.map(|event| event.form_schema))
    }

    /// Capacity ceiling and current registrant count of an event
    async fn capacity_state(&self, event_id: i64) -> Result<Option<CapacityState>>;

    async fn email_registered(&self, event_id: i64, email: &str) -> Result<bool>;

    /// Insert a guest, re-checking capacity and uniqueness in the same unit of work.
    async fn insert_guest(&self, guest: NewGuest) -> Result<InsertOutcome>;

    async fn find_guest_by_code(&self, guest_code: &str) -> Result<Option<Guest>>;

    /// Flip `attended` to true if, and only if, it is still false.
    /// Returns `None` when another caller got there first.
    async fn mark_attended(&self, guest_id: i64, record: CheckInRecord) -> Result<Option<Guest>>;

    async fn attendance_summary(&self, event_id: i64) -> Result<Option<AttendanceSummary>>;
}
