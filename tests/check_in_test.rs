//! Integration tests for guest verification and door check-in

mod helpers;

use assert_matches::assert_matches;
use GuestPass::models::{CreateEventRequest, Guest};
use GuestPass::services::{encode_payload, CheckInOutcome, QrPayload, RegistrationRequest};
use GuestPass::GuestPassError;

use helpers::{numbered_guest, TestContext};

async fn registered_guest(ctx: &TestContext, event_id: i64, n: usize) -> Guest {
    ctx.services
        .registration
        .register(event_id, RegistrationRequest::online(numbered_guest(n)))
        .await
        .expect("Failed to register test guest")
}

#[tokio::test]
async fn test_first_check_in_records_details() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("conference", "Conference")).await;
    let guest = registered_guest(&ctx, event.id, 1).await;

    let outcome = ctx
        .services
        .check_in
        .check_in(&guest.guest_code, event.id, "staff-anna", Some("North Gate"))
        .await
        .unwrap();

    assert!(outcome.is_first_check_in());
    let checked = outcome.guest();
    assert!(checked.attended);
    assert!(checked.checked_in_at.is_some());
    assert_eq!(checked.checked_in_by.as_deref(), Some("staff-anna"));
    assert_eq!(checked.check_in_gate.as_deref(), Some("North Gate"));
}

#[tokio::test]
async fn test_second_check_in_reports_original_record() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("repeat", "Repeat")).await;
    let guest = registered_guest(&ctx, event.id, 1).await;

    let first = ctx
        .services
        .check_in
        .check_in(&guest.guest_code, event.id, "staff-anna", Some("A"))
        .await
        .unwrap();
    let second = ctx
        .services
        .check_in
        .check_in(&guest.guest_code, event.id, "staff-ben", Some("B"))
        .await
        .unwrap();

    assert_matches!(second, CheckInOutcome::AlreadyCheckedIn(_));
    assert_eq!(second.guest().checked_in_at, first.guest().checked_in_at);
    assert_eq!(second.guest().checked_in_by.as_deref(), Some("staff-anna"));
    assert_eq!(second.guest().check_in_gate.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_blank_gate_is_not_stored() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("no-gate", "No Gate")).await;
    let guest = registered_guest(&ctx, event.id, 1).await;

    let outcome = ctx
        .services
        .check_in
        .check_in(&guest.guest_code, event.id, "staff", Some("   "))
        .await
        .unwrap();
    assert!(outcome.guest().check_in_gate.is_none());
}

#[tokio::test]
async fn test_actor_is_required() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("actor", "Actor")).await;
    let guest = registered_guest(&ctx, event.id, 1).await;

    let result = ctx
        .services
        .check_in
        .check_in(&guest.guest_code, event.id, "  ", None)
        .await;
    assert_matches!(result, Err(GuestPassError::InvalidInput(_)));

    let resolved = ctx.services.check_in.resolve(&guest.guest_code, event.id).await.unwrap();
    assert!(!resolved.attended);
}

#[tokio::test]
async fn test_wrong_event_does_not_admit() {
    let ctx = TestContext::new();
    let home = ctx.create_event(CreateEventRequest::new("event-x", "Event X")).await;
    let other = ctx.create_event(CreateEventRequest::new("event-y", "Event Y")).await;
    let guest = registered_guest(&ctx, home.id, 1).await;

    let result = ctx
        .services
        .check_in
        .check_in(&guest.guest_code, other.id, "staff", None)
        .await;
    assert_matches!(
        result,
        Err(GuestPassError::EventMismatch { expected, actual, .. }) if expected == other.id && actual == home.id
    );

    let resolved = ctx.services.check_in.resolve(&guest.guest_code, home.id).await.unwrap();
    assert!(!resolved.attended);
}

#[tokio::test]
async fn test_unknown_code() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("unknown", "Unknown")).await;

    let result = ctx.services.check_in.resolve("REG-NOPE-0000", event.id).await;
    assert_matches!(result, Err(GuestPassError::GuestNotFound { ref guest_code }) if guest_code == "REG-NOPE-0000");

    let result = ctx
        .services
        .check_in
        .check_in("REG-NOPE-0000", event.id, "staff", None)
        .await;
    assert_matches!(result, Err(GuestPassError::GuestNotFound { .. }));
}

#[tokio::test]
async fn test_guest_code_whitespace_is_ignored() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("padded-code", "Padded Code")).await;
    let guest = registered_guest(&ctx, event.id, 1).await;
    let padded = format!("  {}\n", guest.guest_code);

    let resolved = ctx.services.check_in.resolve(&padded, event.id).await.unwrap();
    assert_eq!(resolved.id, guest.id);

    let outcome = ctx
        .services
        .check_in
        .check_in(&padded, event.id, "staff", None)
        .await
        .unwrap();
    assert!(outcome.is_first_check_in());
    assert_eq!(outcome.guest().guest_code, guest.guest_code);
}

#[tokio::test]
async fn test_resolve_is_read_only() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("lookup", "Lookup")).await;
    let guest = registered_guest(&ctx, event.id, 1).await;

    for _ in 0..3 {
        let resolved = ctx.services.check_in.resolve(&guest.guest_code, event.id).await.unwrap();
        assert_eq!(resolved, guest);
    }
}

#[tokio::test]
async fn test_scan_accepts_payload_and_code() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("scanner", "Scanner")).await;
    let by_payload = registered_guest(&ctx, event.id, 1).await;
    let by_code = registered_guest(&ctx, event.id, 2).await;

    let outcome = ctx
        .services
        .check_in
        .check_in_scan(&format!("  {}\n", by_payload.qr_payload), event.id, "door", None)
        .await
        .unwrap();
    assert!(outcome.is_first_check_in());
    assert_eq!(outcome.guest().guest_code, by_payload.guest_code);

    let outcome = ctx
        .services
        .check_in
        .check_in_scan(&by_code.guest_code, event.id, "door", None)
        .await
        .unwrap();
    assert!(outcome.is_first_check_in());
    assert_eq!(outcome.guest().id, by_code.id);

    let repeat = ctx
        .services
        .check_in
        .check_in_scan(&by_payload.qr_payload, event.id, "door", None)
        .await
        .unwrap();
    assert_matches!(repeat, CheckInOutcome::AlreadyCheckedIn(_));
}

#[tokio::test]
async fn test_scan_of_payload_for_other_event() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("scan-home", "Scan Home")).await;
    let guest = registered_guest(&ctx, event.id, 1).await;

    let forged = encode_payload(&QrPayload {
        guest_code: guest.guest_code.clone(),
        event_id: event.id + 100,
        issued_at: chrono::Utc::now(),
    })
    .unwrap();

    let result = ctx.services.check_in.check_in_scan(&forged, event.id, "door", None).await;
    assert_matches!(result, Err(GuestPassError::EventMismatch { .. }));
    assert!(!ctx.services.check_in.resolve(&guest.guest_code, event.id).await.unwrap().attended);
}

#[tokio::test]
async fn test_empty_scan_is_rejected() {
    let ctx = TestContext::new();
    let event = ctx.create_event(CreateEventRequest::new("empty-scan", "Empty Scan")).await;

    let result = ctx.services.check_in.check_in_scan(" \t ", event.id, "door", None).await;
    assert_matches!(result, Err(GuestPassError::InvalidInput(_)));
}

#[tokio::test]
async fn test_attendance_summary() {
    let ctx = TestContext::new();
    let event = ctx
        .create_event(CreateEventRequest::new("summary", "Summary").with_capacity(10))
        .await;
    let mut guests = Vec::new();
    for n in 0..4 {
        guests.push(registered_guest(&ctx, event.id, n).await);
    }
    for guest in &guests[..3] {
        ctx.services
            .check_in
            .check_in(&guest.guest_code, event.id, "staff", None)
            .await
            .unwrap();
    }
    ctx.services
        .check_in
        .check_in(&guests[0].guest_code, event.id, "staff", None)
        .await
        .unwrap();

    let summary = ctx.services.check_in.attendance_summary(event.id).await.unwrap();
    assert_eq!(summary.registered, 4);
    assert_eq!(summary.attended, 3);
    assert_eq!(summary.capacity, Some(10));
    assert_eq!(summary.remaining, Some(6));

    let missing = ctx.services.check_in.attendance_summary(event.id + 1).await;
    assert_matches!(missing, Err(GuestPassError::EventNotFound { .. }));
}
