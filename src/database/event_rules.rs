//! Checks applied by event stores before mutating an event

use crate::models::FormSchema;
use crate::utils::errors::{GuestPassError, Result};

pub fn check_new_event(code: &str, capacity: Option<i32>, schema: &FormSchema) -> Result<()> {
    check_event_code(code)?;
    check_capacity_change(capacity, 0)?;
    check_schema(schema)
}

/// Event codes end up in shareable links, so they stay lowercase slugs.
pub fn check_event_code(code: &str) -> Result<()> {
    let valid = !code.is_empty()
        && code.len() <= 64
        && !code.starts_with('-')
        && code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(GuestPassError::InvalidInput(format!("Invalid event code: {:?}", code)))
    }
}

pub fn check_schema(schema: &FormSchema) -> Result<()> {
    schema.check_definition().map_err(GuestPassError::Validation)
}

/// Capacity must stay positive and may not drop below the guests already admitted.
pub fn check_capacity_change(capacity: Option<i32>, registered: i64) -> Result<()> {
    match capacity {
        Some(capacity) if capacity <= 0 => Err(GuestPassError::InvalidInput(
            "Capacity must be a positive number".to_string(),
        )),
        Some(capacity) if i64::from(capacity) < registered => Err(GuestPassError::InvalidInput(format!(
            "Capacity {} is below the {} guests already registered",
            capacity, registered
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_code_slugs() {
        assert!(check_event_code("tech-summit-2026").is_ok());
        assert!(check_event_code("Tech Summit").is_err());
        assert!(check_event_code("a/b").is_err());
        assert!(check_event_code("").is_err());
        assert!(check_event_code("-leading").is_err());
    }

    #[test]
    fn test_capacity_change() {
        assert!(check_capacity_change(None, 10).is_ok());
        assert!(check_capacity_change(Some(10), 10).is_ok());
        assert!(check_capacity_change(Some(9), 10).is_err());
        assert!(check_capacity_change(Some(0), 0).is_err());
    }
}
