//! GuestPass
//!
//! Guest lifecycle engine for scheduled events: registration against a per-event
//! intake form, capacity-bounded admission, QR credential issuing and at-most-once
//! door check-in.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GuestPassError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, GuestStore, MemoryStore};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
