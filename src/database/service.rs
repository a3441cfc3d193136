//! Database service layer
//!
//! Groups the Postgres repositories and exposes them through the
//! [`GuestStore`] boundary

use async_trait::async_trait;
use crate::database::{DatabasePool, EventRepository, GuestRepository};
use crate::database::store::{GuestStore, InsertOutcome};
use crate::models::*;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub events: EventRepository,
    pub guests: GuestRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            guests: GuestRepository::new(pool),
        }
    }
}

#[async_trait]
impl GuestStore for DatabaseService {
    async fn find_event(&self, event_id: i64) -> Result<Option<Event>> {
        self.events.find_by_id(event_id).await
    }

    async fn capacity_state(&self, event_id: i64) -> Result<Option<CapacityState>> {
        self.events.capacity_state(event_id).await
    }

    async fn email_registered(&self, event_id: i64, email: &str) -> Result<bool> {
        self.guests.email_exists(event_id, email).await
    }

    async fn insert_guest(&self, guest: NewGuest) -> Result<InsertOutcome> {
        self.guests.insert_within_capacity(guest).await
    }

    async fn find_guest_by_code(&self, guest_code: &str) -> Result<Option<Guest>> {
        self.guests.find_by_code(guest_code).await
    }

    async fn mark_attended(&self, guest_id: i64, record: CheckInRecord) -> Result<Option<Guest>> {
        self.guests.mark_attended(guest_id, record).await
    }

    async fn attendance_summary(&self, event_id: i64) -> Result<Option<AttendanceSummary>> {
        self.guests.attendance_summary(event_id).await
    }
}
