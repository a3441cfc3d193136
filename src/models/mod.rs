//! Data models module
//!
//! This module contains all data structures used throughout the engine

pub mod event;
pub mod form_schema;
pub mod guest;

// Re-export commonly used models
pub use event::{Event, CreateEventRequest, CapacityState, AttendanceSummary};
pub use form_schema::{FormSchema, FieldSettings, CoreField, CustomField, CustomFieldType};
pub use guest::{Guest, GuestFields, GuestCategory, NewGuest, CheckInRecord, RegistrationType, RegistrationSource};
