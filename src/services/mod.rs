//! Services module
//!
//! This module contains the guest lifecycle business logic

pub mod admission;
pub mod check_in;
pub mod credentials;
pub mod form_validator;
pub mod notification;
pub mod registration;

// Re-export commonly used services
pub use admission::{Admission, CapacityGuard, DuplicateCheck, DuplicateDetector};
pub use check_in::{CheckInOutcome, CheckInService};
pub use credentials::{Credential, CredentialService, QrPayload, decode_payload, encode_payload};
pub use form_validator::{FieldSubmission, FormValidator};
pub use notification::{LogMailer, Mailer, NotificationService, NotificationStats, TicketNotification};
pub use registration::{RegistrationRequest, RegistrationService};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::GuestStore;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub registration: RegistrationService,
    pub check_in: CheckInService,
    pub notifications: NotificationService,
    store: Arc<dyn GuestStore>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory over one shared store
    pub fn new(store: Arc<dyn GuestStore>, settings: &Settings, notifications: NotificationService) -> Result<Self> {
        let registration = RegistrationService::new(store.clone(), &settings.credentials, notifications.clone())?;
        let check_in = CheckInService::new(store.clone());

        Ok(Self {
            registration,
            check_in,
            notifications,
            store,
        })
    }

    /// Store shared by every service
    pub fn store(&self) -> &dyn GuestStore {
        self.store.as_ref()
    }
}
