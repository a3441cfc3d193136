//! Test helpers module
//!
//! Shared fixtures for the integration tests: service wiring over an in-memory
//! store, submission builders and an optional Postgres database.

#![allow(dead_code)]

use std::sync::{Arc, Once};
use sqlx::PgPool;
use GuestPass::config::Settings;
use GuestPass::database::{DatabaseService, MemoryStore};
use GuestPass::models::{CreateEventRequest, Event};
use GuestPass::services::{FieldSubmission, NotificationService, ServiceFactory};

static INIT: Once = Once::new();

/// Initialize test logging once per binary
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("guestpass=debug,GuestPass=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Services and the memory store they share
pub struct TestContext {
    pub store: MemoryStore,
    pub services: ServiceFactory,
}

impl TestContext {
    pub fn new() -> Self {
        init_test_logging();
        let store = MemoryStore::new();
        let services = ServiceFactory::new(
            Arc::new(store.clone()),
            &Settings::default(),
            NotificationService::disabled(),
        )
        .expect("Failed to build services");
        Self { store, services }
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> Event {
        self.store
            .create_event(request)
            .await
            .expect("Failed to create test event")
    }
}

/// Submission with the three default-required fields filled in
pub fn guest_fields(full_name: &str, email: &str) -> FieldSubmission {
    let mut fields = FieldSubmission::new();
    fields.insert("full_name".to_string(), full_name.to_string());
    fields.insert("email".to_string(), email.to_string());
    fields.insert("contact_number".to_string(), "+1 555 010 0199".to_string());
    fields
}

/// Numbered guest for bulk and concurrency tests
pub fn numbered_guest(n: usize) -> FieldSubmission {
    guest_fields(&format!("Guest Number {}", n), &format!("guest{}@example.com", n))
}

/// Postgres test database, available when `TEST_DATABASE_URL` is set
pub struct TestDatabase {
    pub pool: PgPool,
    pub service: DatabaseService,
}

impl TestDatabase {
    pub async fn from_env() -> Option<Self> {
        init_test_logging();
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.expect("Failed to connect to test database");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        let service = DatabaseService::new(pool.clone());
        Some(Self { pool, service })
    }

    /// Unique event code so repeated runs never collide
    pub fn unique_code(prefix: &str) -> String {
        format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
    }
}
