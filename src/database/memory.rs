//! In-process guest store
//!
//! Backs tests and local runs without Postgres. All state sits behind one async
//! mutex, so each store call is a single critical section.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use crate::models::{
    AttendanceSummary, CapacityState, CheckInRecord, CreateEventRequest, Event, FormSchema, Guest, NewGuest,
};
use crate::utils::errors::{GuestPassError, Result};
use super::event_rules;
use super::store::{GuestStore, InsertOutcome};

#[derive(Default)]
struct MemoryState {
    next_event_id: i64,
    next_guest_id: i64,
    events: HashMap<i64, Event>,
    guests: HashMap<i64, Guest>,
}

impl MemoryState {
    fn guests_of(&self, event_id: i64) -> impl Iterator<Item = &Guest> {
        self.guests.values().filter(move |guest| guest.event_id == event_id)
    }

    fn event_mut(&mut self, event_id: i64) -> Result<&mut Event> {
        self.events
            .get_mut(&event_id)
            .ok_or(GuestPassError::EventNotFound { event_id })
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an event, applying the same rules as the Postgres repository
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        let schema = request.form_schema.unwrap_or_default();
        event_rules::check_new_event(&request.code, request.capacity, &schema)?;

        let mut state = self.state.lock().await;
        if state.events.values().any(|event| event.code == request.code) {
            return Err(GuestPassError::InvalidInput(format!("Event code already in use: {}", request.code)));
        }

        state.next_event_id += 1;
        let now = Utc::now();
        let event = Event {
            id: state.next_event_id,
            code: request.code,
            title: request.title,
            capacity: request.capacity,
            registration_open: request.registration_open,
            form_schema: schema,
            created_at: now,
            updated_at: now,
        };
        state.events.insert(event.id, event.clone());
        debug!(event_id = event.id, code = %event.code, "Event created in memory store");
        Ok(event)
    }

    pub async fn update_form_schema(&self, event_id: i64, schema: FormSchema) -> Result<Event> {
        event_rules::check_schema(&schema)?;
        let mut state = self.state.lock().await;
        let event = state.event_mut(event_id)?;
        event.form_schema = schema;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    pub async fn set_registration_open(&self, event_id: i64, open: bool) -> Result<Event> {
        let mut state = self.state.lock().await;
        let event = state.event_mut(event_id)?;
        event.registration_open = open;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    pub async fn set_capacity(&self, event_id: i64, capacity: Option<i32>) -> Result<Event> {
        let mut state = self.state.lock().await;
        let registered = state.guests_of(event_id).count() as i64;
        event_rules::check_capacity_change(capacity, registered)?;
        let event = state.event_mut(event_id)?;
        event.capacity = capacity;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    /// Number of guests stored for an event
    pub async fn guest_count(&self, event_id: i64) -> usize {
        self.state.lock().await.guests_of(event_id).count()
    }
}

#[async_trait]
impl GuestStore for MemoryStore {
    async fn find_event(&self, event_id: i64) -> Result<Option<Event>> {
        Ok(self.state.lock().await.events.get(&event_id).cloned())
    }

    async fn capacity_state(&self, event_id: i64) -> Result<Option<CapacityState>> {
        let state = self.state.lock().await;
        Ok(state.events.get(&event_id).map(|event| CapacityState {
            capacity: event.capacity,
            registered: state.guests_of(event_id).count() as i64,
        }))
    }

    async fn email_registered(&self, event_id: i64, email: &str) -> Result<bool> {
        let state = self.state.lock().await;
        let found = state
            .guests_of(event_id)
            .any(|guest| guest.fields.email.as_deref() == Some(email));
        Ok(found)
    }

    async fn insert_guest(&self, guest: NewGuest) -> Result<InsertOutcome> {
        let mut state = self.state.lock().await;
        let capacity = state
            .events
            .get(&guest.event_id)
            .ok_or(GuestPassError::EventNotFound { event_id: guest.event_id })?
            .capacity;

        if let Some(capacity) = capacity {
            if state.guests_of(guest.event_id).count() as i64 >= i64::from(capacity) {
                return Ok(InsertOutcome::CapacityReached { capacity });
            }
        }
        if let Some(email) = guest.fields.email.as_deref() {
            if state
                .guests_of(guest.event_id)
                .any(|existing| existing.fields.email.as_deref() == Some(email))
            {
                return Ok(InsertOutcome::DuplicateEmail);
            }
        }
        if state.guests.values().any(|existing| existing.guest_code == guest.guest_code) {
            return Ok(InsertOutcome::DuplicateCode);
        }

        state.next_guest_id += 1;
        let stored = Guest {
            id: state.next_guest_id,
            event_id: guest.event_id,
            guest_code: guest.guest_code,
            qr_payload: guest.qr_payload,
            fields: guest.fields,
            registration_type: guest.registration_type,
            registration_source: guest.registration_source,
            attended: false,
            checked_in_at: None,
            check_in_gate: None,
            checked_in_by: None,
            created_at: Utc::now(),
        };
        state.guests.insert(stored.id, stored.clone());
        Ok(InsertOutcome::Inserted(stored))
    }

    async fn find_guest_by_code(&self, guest_code: &str) -> Result<Option<Guest>> {
        let state = self.state.lock().await;
        Ok(state
            .guests
            .values()
            .find(|guest| guest.guest_code == guest_code)
            .cloned())
    }

    async fn mark_attended(&self, guest_id: i64, record: CheckInRecord) -> Result<Option<Guest>> {
        let mut state = self.state.lock().await;
        match state.guests.get_mut(&guest_id) {
            Some(guest) if !guest.attended => {
                guest.attended = true;
                guest.checked_in_at = Some(record.checked_in_at);
                guest.checked_in_by = Some(record.checked_in_by);
                guest.check_in_gate = record.gate;
                Ok(Some(guest.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn attendance_summary(&self, event_id: i64) -> Result<Option<AttendanceSummary>> {
        let state = self.state.lock().await;
        let Some(event) = state.events.get(&event_id) else {
            return Ok(None);
        };
        let registered = state.guests_of(event_id).count() as i64;
        let attended = state.guests_of(event_id).filter(|guest| guest.attended).count() as i64;
        let capacity_state = CapacityState { capacity: event.capacity, registered };
        Ok(Some(AttendanceSummary {
            event_id,
            registered,
            attended,
            capacity: event.capacity,
            remaining: capacity_state.remaining(),
        }))
    }
}
