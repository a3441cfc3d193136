//! Database module
//!
//! This module handles database connections, the storage boundary used by the
//! services and its Postgres and in-memory implementations

pub mod connection;
pub mod event_rules;
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check};
pub use memory::MemoryStore;
pub use repositories::{EventRepository, GuestRepository};
pub use service::DatabaseService;
pub use store::{GuestStore, InsertOutcome};
