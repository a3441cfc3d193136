//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use super::form_schema::FormSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub capacity: Option<i32>,
    pub registration_open: bool,
    pub form_schema: FormSchema,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub code: String,
    pub title: String,
    pub capacity: Option<i32>,
    pub registration_open: bool,
    pub form_schema: Option<FormSchema>,
}

impl CreateEventRequest {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            capacity: None,
            registration_open: true,
            form_schema: None,
        }
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_schema(mut self, schema: FormSchema) -> Self {
        self.form_schema = Some(schema);
        self
    }

    pub fn closed(mut self) -> Self {
        self.registration_open = false;
        self
    }
}

/// Capacity ceiling together with the number of guests already admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityState {
    pub capacity: Option<i32>,
    pub registered: i64,
}

impl CapacityState {
    pub fn remaining(&self) -> Option<i64> {
        self.capacity
            .map(|capacity| (i64::from(capacity) - self.registered).max(0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub event_id: i64,
    pub registered: i64,
    pub attended: i64,
    pub capacity: Option<i32>,
    pub remaining: Option<i64>,
}
