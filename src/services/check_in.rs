//! Door check-in and guest verification
//!
//! A guest moves from not-attended to attended once. Repeated scans are
//! reported as [`CheckInOutcome::AlreadyCheckedIn`] with the original details.

use std::sync::Arc;
use chrono::Utc;
use tracing::debug;
use crate::database::GuestStore;
use crate::models::{AttendanceSummary, CheckInRecord, Guest};
use crate::services::credentials;
use crate::utils::errors::{GuestPassError, Result};
use crate::utils::logging;

#[derive(Debug, Clone, PartialEq)]
pub enum CheckInOutcome {
    /// This call admitted the guest
    CheckedIn(Guest),
    /// The guest was admitted earlier; the snapshot carries the first check-in
    AlreadyCheckedIn(Guest),
}

impl CheckInOutcome {
    pub fn guest(&self) -> &Guest {
        match self {
            CheckInOutcome::CheckedIn(guest) | CheckInOutcome::AlreadyCheckedIn(guest) => guest,
        }
    }

    pub fn is_first_check_in(&self) -> bool {
        matches!(self, CheckInOutcome::CheckedIn(_))
    }
}

#[derive(Clone)]
pub struct CheckInService {
    store: Arc<dyn GuestStore>,
}

impl CheckInService {
    pub fn new(store: Arc<dyn GuestStore>) -> Self {
        Self { store }
    }

    /// Look a guest up for display without touching attendance
    pub async fn resolve(&self, guest_code: &str, event_id: i64) -> Result<Guest> {
        let guest_code = guest_code.trim();
        let guest = self
            .store
            .find_guest_by_code(guest_code)
            .await?
            .ok_or_else(|| GuestPassError::GuestNotFound { guest_code: guest_code.to_string() })?;

        if guest.event_id != event_id {
            return Err(GuestPassError::EventMismatch {
                guest_code: guest.guest_code,
                expected: event_id,
                actual: guest.event_id,
            });
        }
        Ok(guest)
    }

    /// Admit a guest by code
    pub async fn check_in(
        &self,
        guest_code: &str,
        event_id: i64,
        actor: &str,
        gate: Option<&str>,
    ) -> Result<CheckInOutcome> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(GuestPassError::InvalidInput("Check-in actor is required".to_string()));
        }

        let guest = self.resolve(guest_code, event_id).await?;
        if guest.attended {
            logging::log_repeat_scan(&guest, actor);
            return Ok(CheckInOutcome::AlreadyCheckedIn(guest));
        }

        let record = CheckInRecord {
            checked_in_at: Utc::now(),
            checked_in_by: actor.to_string(),
            gate: gate.map(str::trim).filter(|gate| !gate.is_empty()).map(str::to_string),
        };

        match self.store.mark_attended(guest.id, record).await? {
            Some(updated) => {
                logging::log_check_in(&updated, actor);
                Ok(CheckInOutcome::CheckedIn(updated))
            }
            None => {
                // Lost the race against a concurrent scan; report the winner's record.
                let current = self.resolve(guest_code, event_id).await?;
                logging::log_repeat_scan(&current, actor);
                Ok(CheckInOutcome::AlreadyCheckedIn(current))
            }
        }
    }

    /// Admit a guest from scanner input, either a QR payload or a typed guest code
    pub async fn check_in_scan(
        &self,
        scanned: &str,
        event_id: i64,
        actor: &str,
        gate: Option<&str>,
    ) -> Result<CheckInOutcome> {
        let scanned = scanned.trim();
        if scanned.is_empty() {
            return Err(GuestPassError::InvalidInput("Nothing was scanned".to_string()));
        }

        match credentials::decode_payload(scanned) {
            Ok(payload) => {
                if payload.event_id != event_id {
                    return Err(GuestPassError::EventMismatch {
                        guest_code: payload.guest_code,
                        expected: event_id,
                        actual: payload.event_id,
                    });
                }
                self.check_in(&payload.guest_code, event_id, actor, gate).await
            }
            Err(e) => {
                debug!(error = %e, "Scan is not a QR payload, treating it as a guest code");
                self.check_in(scanned, event_id, actor, gate).await
            }
        }
    }

    pub async fn attendance_summary(&self, event_id: i64) -> Result<AttendanceSummary> {
        self.store
            .attendance_summary(event_id)
            .await?
            .ok_or(GuestPassError::EventNotFound { event_id })
    }
}
