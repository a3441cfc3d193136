//! Ticket notification service
//!
//! Registration hands finished guests to a bounded queue; a worker task
//! delivers tickets through a [`Mailer`]. Nothing here reports failure back
//! to the registration that produced the ticket.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn, error, debug};
use crate::config::NotificationConfig;
use crate::models::Guest;
use crate::utils::errors::Result;
use crate::utils::helpers::generate_uuid;

/// Ticket email waiting to be delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketNotification {
    pub id: String,
    pub event_id: i64,
    pub guest_code: String,
    pub qr_payload: String,
    pub recipient: String,
    pub guest_name: String,
}

impl TicketNotification {
    /// Build a ticket for a guest, if the guest gave an email address
    pub fn for_guest(guest: &Guest) -> Option<Self> {
        let recipient = guest.fields.email.clone()?;
        Some(Self {
            id: generate_uuid(),
            event_id: guest.event_id,
            guest_code: guest.guest_code.clone(),
            qr_payload: guest.qr_payload.clone(),
            recipient,
            guest_name: guest.display_name().to_string(),
        })
    }
}

/// Outbound email delivery
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_ticket(&self, sender: &str, ticket: &TicketNotification) -> Result<()>;
}

/// Mailer that only records the ticket in the log
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_ticket(&self, sender: &str, ticket: &TicketNotification) -> Result<()> {
        info!(
            notification_id = %ticket.id,
            sender = sender,
            recipient = %ticket.recipient,
            guest_code = %ticket.guest_code,
            "Ticket email delivered to log"
        );
        Ok(())
    }
}

/// Notification statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStats {
    pub queued: u64,
    pub dropped: u64,
    pub sent: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    queued: AtomicU64,
    dropped: AtomicU64,
    sent: AtomicU64,
    failed: AtomicU64,
}

/// Notification service handle, cheap to clone
#[derive(Clone)]
pub struct NotificationService {
    queue: Option<mpsc::Sender<TicketNotification>>,
    counters: Arc<Counters>,
}

impl NotificationService {
    /// A service that accepts tickets and discards them
    pub fn disabled() -> Self {
        Self {
            queue: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Start the delivery worker on the current tokio runtime
    pub fn start(config: &NotificationConfig, mailer: Arc<dyn Mailer>) -> (Self, Option<JoinHandle<()>>) {
        if !config.enabled {
            info!("Ticket notifications disabled");
            return (Self::disabled(), None);
        }

        if config.queue_capacity == 0 {
            warn!("Notification queue capacity is 0, using 1");
        }
        let queue_capacity = config.queue_capacity.max(1);

        let (sender, receiver) = mpsc::channel(queue_capacity);
        let counters = Arc::new(Counters::default());
        let worker = tokio::spawn(run_worker(receiver, mailer, config.sender.clone(), counters.clone()));
        info!(queue_capacity = queue_capacity, "Ticket notification worker started");

        (
            Self {
                queue: Some(sender),
                counters,
            },
            Some(worker),
        )
    }

    /// Enqueue a ticket for a newly registered guest without waiting
    pub fn ticket_issued(&self, guest: &Guest) {
        let Some(queue) = &self.queue else {
            return;
        };
        let Some(ticket) = TicketNotification::for_guest(guest) else {
            debug!(guest_code = %guest.guest_code, "No email on guest, ticket not sent");
            return;
        };

        match queue.try_send(ticket) {
            Ok(()) => {
                self.counters.queued.fetch_add(1, Ordering::Relaxed);
            }
            Err(mpsc::error::TrySendError::Full(ticket)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(guest_code = %ticket.guest_code, "Notification queue full, ticket dropped");
            }
            Err(mpsc::error::TrySendError::Closed(ticket)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(guest_code = %ticket.guest_code, "Notification worker stopped, ticket dropped");
            }
        }
    }

    pub fn stats(&self) -> NotificationStats {
        NotificationStats {
            queued: self.counters.queued.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            sent: self.counters.sent.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<TicketNotification>,
    mailer: Arc<dyn Mailer>,
    sender: String,
    counters: Arc<Counters>,
) {
    while let Some(ticket) = receiver.recv().await {
        match mailer.send_ticket(&sender, &ticket).await {
            Ok(()) => {
                counters.sent.fetch_add(1, Ordering::Relaxed);
                debug!(notification_id = %ticket.id, guest_code = %ticket.guest_code, "Ticket sent");
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(notification_id = %ticket.id, guest_code = %ticket.guest_code, error = %e, "Failed to send ticket");
            }
        }
    }
    info!("Ticket notification worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuestFields, RegistrationSource, RegistrationType};
    use crate::utils::errors::GuestPassError;
    use chrono::Utc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<TicketNotification>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_ticket(&self, _sender: &str, ticket: &TicketNotification) -> Result<()> {
            if ticket.recipient.starts_with("bounce") {
                return Err(GuestPassError::InvalidInput("mailbox unavailable".to_string()));
            }
            self.sent.lock().await.push(ticket.clone());
            Ok(())
        }
    }

    fn guest(email: Option<&str>) -> Guest {
        Guest {
            id: 1,
            event_id: 9,
            guest_code: "REG-LOYW3V28-AB12".to_string(),
            qr_payload: "payload".to_string(),
            fields: GuestFields {
                full_name: Some("Ada Lovelace".to_string()),
                email: email.map(str::to_string),
                ..GuestFields::default()
            },
            registration_type: RegistrationType::SelfRegistered,
            registration_source: RegistrationSource::OnlineForm,
            attended: false,
            checked_in_at: None,
            check_in_gate: None,
            checked_in_by: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_worker_delivers_and_counts() {
        let mailer = Arc::new(RecordingMailer::default());
        let (service, worker) = NotificationService::start(&NotificationConfig::default(), mailer.clone());

        service.ticket_issued(&guest(Some("ada@example.com")));
        service.ticket_issued(&guest(Some("bounce@example.com")));
        service.ticket_issued(&guest(None));
        let stats_before = service.stats();
        assert_eq!(stats_before.queued, 2);

        drop(service);
        worker.unwrap().await.unwrap();

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "ada@example.com");
        assert_eq!(sent[0].guest_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_zero_queue_capacity_still_starts() {
        let config = NotificationConfig {
            queue_capacity: 0,
            ..NotificationConfig::default()
        };
        let mailer = Arc::new(RecordingMailer::default());
        let (service, worker) = NotificationService::start(&config, mailer.clone());

        service.ticket_issued(&guest(Some("ada@example.com")));
        drop(service);
        worker.unwrap().await.unwrap();

        assert_eq!(mailer.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_full_queue_drops_instead_of_blocking() {
        let config = NotificationConfig {
            queue_capacity: 1,
            ..NotificationConfig::default()
        };
        let (sender, _receiver) = mpsc::channel(config.queue_capacity);
        let service = NotificationService {
            queue: Some(sender),
            counters: Arc::new(Counters::default()),
        };

        service.ticket_issued(&guest(Some("ada@example.com")));
        service.ticket_issued(&guest(Some("ada@example.com")));
        assert_eq!(service.stats(), NotificationStats { queued: 1, dropped: 1, sent: 0, failed: 0 });
    }

    #[test]
    fn test_disabled_service_ignores_tickets() {
        let service = NotificationService::disabled();
        service.ticket_issued(&guest(Some("ada@example.com")));
        assert_eq!(service.stats(), NotificationStats::default());
    }
}
