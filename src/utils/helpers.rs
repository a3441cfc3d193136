//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the engine.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Encode a number in uppercase base 36
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }

    let mut encoded = Vec::new();
    while value > 0 {
        encoded.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    encoded.reverse();
    encoded.into_iter().map(char::from).collect()
}

/// Generate a random uppercase alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_random_string_charset() {
        let value = generate_random_string(64);
        assert_eq!(value.len(), 64);
        assert!(value.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Ada   Lovelace \t"), "Ada Lovelace");
    }
}
