//! Admission checks run before a guest is inserted
//!
//! Both checks are early exits only. The store re-evaluates capacity and email
//! uniqueness inside the insert itself.

use tracing::debug;
use crate::database::GuestStore;
use crate::models::{CapacityState, FormSchema};
use crate::utils::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admit,
    Deny { capacity: i32 },
}

/// Per-event registrant ceiling
pub struct CapacityGuard;

impl CapacityGuard {
    pub fn check(state: &CapacityState) -> Admission {
        match state.capacity {
            Some(capacity) if state.registered >= i64::from(capacity) => Admission::Deny { capacity },
            _ => Admission::Admit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateCheck {
    Clear,
    AlreadyRegistered,
}

/// Looks for an earlier registration of the same email within one event
pub struct DuplicateDetector<'a> {
    store: &'a dyn GuestStore,
}

impl<'a> DuplicateDetector<'a> {
    pub fn new(store: &'a dyn GuestStore) -> Self {
        Self { store }
    }

    /// `email` must already be normalized. Skipped when the schema does not
    /// collect email or none was given.
    pub async fn check(&self, event_id: i64, schema: &FormSchema, email: Option<&str>) -> Result<DuplicateCheck> {
        let Some(email) = email.filter(|_| schema.collects_email()) else {
            debug!(event_id = event_id, "Duplicate check skipped, no email collected");
            return Ok(DuplicateCheck::Clear);
        };

        if self.store.email_registered(event_id, email).await? {
            Ok(DuplicateCheck::AlreadyRegistered)
        } else {
            Ok(DuplicateCheck::Clear)
        }
    }
}
