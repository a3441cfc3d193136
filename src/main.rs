//! GuestPass door scanner
//!
//! Connects to the guest database and checks in every line read from stdin.
//! Barcode scanners type a QR payload followed by Enter; staff may also type a
//! guest code by hand.

use std::sync::Arc;
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, error};

use GuestPass::{
    config::Settings,
    utils::{logging, helpers::{format_timestamp, generate_uuid}},
    database::{DatabaseService, connection::{create_pool, run_migrations, DatabaseConfig}},
    services::{CheckInOutcome, LogMailer, NotificationService, ServiceFactory},
    GuestPassError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new().context("loading configuration")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", GuestPass::info());

    let event_id = settings
        .scanner
        .event_id
        .context("scanner.event_id must be configured (GUESTPASS__SCANNER__EVENT_ID)")?;

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;
    run_migrations(&db_pool).await?;
    let database_service = Arc::new(DatabaseService::new(db_pool));

    let event = database_service
        .events
        .find_by_id(event_id)
        .await?
        .ok_or(GuestPassError::EventNotFound { event_id })?;

    // Initialize services
    let (notifications, notification_worker) =
        NotificationService::start(&settings.notifications, Arc::new(LogMailer));
    let services = ServiceFactory::new(database_service, &settings, notifications)?;

    let session_id = generate_uuid();
    let actor = settings.scanner.actor.clone();
    let gate = settings.scanner.gate.clone();
    info!(session_id = %session_id, event_id = event.id, event_code = %event.code, actor = %actor, gate = ?gate, "Scanner ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let outcome = services
                    .check_in
                    .check_in_scan(&line, event.id, &actor, gate.as_deref())
                    .await;
                println!("{}", describe(outcome));
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received");
                break;
            }
        }
    }

    let summary = services.check_in.attendance_summary(event.id).await?;
    info!(
        session_id = %session_id,
        registered = summary.registered,
        attended = summary.attended,
        "Scanner session finished"
    );

    drop(services);
    if let Some(worker) = notification_worker {
        if let Err(e) = worker.await {
            warn!(error = %e, "Notification worker ended abnormally");
        }
    }

    Ok(())
}

/// One line of scanner feedback for the door staff
fn describe(outcome: GuestPass::Result<CheckInOutcome>) -> String {
    match outcome {
        Ok(CheckInOutcome::CheckedIn(guest)) => {
            format!("OK      {} ({})", guest.display_name(), guest.guest_code)
        }
        Ok(CheckInOutcome::AlreadyCheckedIn(guest)) => format!(
            "REPEAT  {} ({}) first checked in {} by {}",
            guest.display_name(),
            guest.guest_code,
            guest.checked_in_at.map(format_timestamp).unwrap_or_else(|| "-".to_string()),
            guest.checked_in_by.as_deref().unwrap_or("-"),
        ),
        Err(e @ GuestPassError::EventMismatch { .. }) => format!("WRONG EVENT  {}", e),
        Err(e @ GuestPassError::GuestNotFound { .. }) => format!("UNKNOWN  {}", e),
        Err(e) => {
            error!(error = %e, "Check-in failed");
            format!("ERROR   {}", e)
        }
    }
}
