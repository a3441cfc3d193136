//! Registration orchestrator
//!
//! Turns a registration request into a persisted guest holding a fresh
//! credential. Checks run in a fixed order and stop at the first failure:
//! event lookup, open gate, capacity, form validation, duplicate email, insert.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::CredentialConfig;
use crate::database::{GuestStore, InsertOutcome};
use crate::models::{Guest, GuestFields, NewGuest, RegistrationSource};
use crate::services::admission::{Admission, CapacityGuard, DuplicateCheck, DuplicateDetector};
use crate::services::credentials::CredentialService;
use crate::services::form_validator::{FieldSubmission, FormValidator};
use crate::services::notification::NotificationService;
use crate::utils::errors::{GuestPassError, Result};
use crate::utils::logging;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub fields: FieldSubmission,
    pub source: RegistrationSource,
}

impl RegistrationRequest {
    /// Self-service registration through the public form
    pub fn online(fields: FieldSubmission) -> Self {
        Self { fields, source: RegistrationSource::OnlineForm }
    }

    /// Registration entered by staff at the desk
    pub fn manual(fields: FieldSubmission) -> Self {
        Self { fields, source: RegistrationSource::Manual }
    }

    /// One row of an imported guest list
    pub fn imported(fields: FieldSubmission) -> Self {
        Self { fields, source: RegistrationSource::BulkImport }
    }
}

#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn GuestStore>,
    validator: FormValidator,
    credentials: CredentialService,
    notifications: NotificationService,
    max_insert_attempts: u32,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn GuestStore>,
        config: &CredentialConfig,
        notifications: NotificationService,
    ) -> Result<Self> {
        Ok(Self {
            store,
            validator: FormValidator::new()?,
            credentials: CredentialService::new(config.clone()),
            notifications,
            max_insert_attempts: config.max_insert_attempts.max(1),
        })
    }

    /// Register a guest for an event
    pub async fn register(&self, event_id: i64, request: RegistrationRequest) -> Result<Guest> {
        debug!(event_id = event_id, source = request.source.as_str(), "Registering guest");

        match self.try_register(event_id, request).await {
            Ok(guest) => {
                logging::log_registration(&guest);
                self.notifications.ticket_issued(&guest);
                Ok(guest)
            }
            Err(e) => {
                logging::log_rejected_registration(event_id, &e);
                Err(e)
            }
        }
    }

    async fn try_register(&self, event_id: i64, request: RegistrationRequest) -> Result<Guest> {
        let event = self
            .store
            .find_event(event_id)
            .await?
            .ok_or(GuestPassError::EventNotFound { event_id })?;

        if !event.registration_open {
            return Err(GuestPassError::RegistrationClosed { event_id });
        }

        let capacity = self
            .store
            .capacity_state(event_id)
            .await?
            .ok_or(GuestPassError::EventNotFound { event_id })?;
        if let Admission::Deny { capacity } = CapacityGuard::check(&capacity) {
            return Err(GuestPassError::CapacityExceeded { event_id, capacity });
        }

        let fields = self
            .validator
            .validate(&event.form_schema, &request.fields)
            .map_err(GuestPassError::Validation)?;

        let duplicate = DuplicateDetector::new(self.store.as_ref())
            .check(event_id, &event.form_schema, fields.email.as_deref())
            .await?;
        if duplicate == DuplicateCheck::AlreadyRegistered {
            return Err(duplicate_error(event_id, &fields));
        }

        self.insert_with_fresh_code(event_id, fields, request.source).await
    }

    /// Insert the guest, drawing a new code when the store reports a collision.
    async fn insert_with_fresh_code(
        &self,
        event_id: i64,
        fields: GuestFields,
        source: RegistrationSource,
    ) -> Result<Guest> {
        for attempt in 1..=self.max_insert_attempts {
            let credential = self.credentials.issue(source, event_id)?;
            let guest = NewGuest {
                event_id,
                guest_code: credential.guest_code,
                qr_payload: credential.qr_payload,
                fields: fields.clone(),
                registration_type: source.registration_type(),
                registration_source: source,
            };

            match self.store.insert_guest(guest).await? {
                InsertOutcome::Inserted(guest) => return Ok(guest),
                InsertOutcome::CapacityReached { capacity } => {
                    return Err(GuestPassError::CapacityExceeded { event_id, capacity });
                }
                InsertOutcome::DuplicateEmail => return Err(duplicate_error(event_id, &fields)),
                InsertOutcome::DuplicateCode => {
                    logging::log_store_retry("insert_guest", attempt, "guest code collision");
                }
            }
        }

        Err(GuestPassError::StorageConflict(format!(
            "no unique guest code after {} attempts",
            self.max_insert_attempts
        )))
    }
}

fn duplicate_error(event_id: i64, fields: &GuestFields) -> GuestPassError {
    GuestPassError::DuplicateRegistration {
        event_id,
        email: fields.email.clone().unwrap_or_default(),
    }
}
