//! Guest model

use std::collections::BTreeMap;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::errors::GuestPassError;

/// Fixed guest categories. Unknown submitted values fall back to `Regular`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuestCategory {
    #[serde(rename = "VIP")]
    Vip,
    Speaker,
    Sponsor,
    Media,
    #[default]
    Regular,
}

impl GuestCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            GuestCategory::Vip => "VIP",
            GuestCategory::Speaker => "Speaker",
            GuestCategory::Sponsor => "Sponsor",
            GuestCategory::Media => "Media",
            GuestCategory::Regular => "Regular",
        }
    }

    /// Lenient parse used for form input
    pub fn coerce(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for GuestCategory {
    type Err = GuestPassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VIP" => Ok(GuestCategory::Vip),
            "Speaker" => Ok(GuestCategory::Speaker),
            "Sponsor" => Ok(GuestCategory::Sponsor),
            "Media" => Ok(GuestCategory::Media),
            "Regular" => Ok(GuestCategory::Regular),
            other => Err(GuestPassError::InvalidInput(format!("Unknown guest category: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationType {
    PreRegistered,
    SelfRegistered,
}

impl RegistrationType {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationType::PreRegistered => "pre_registered",
            RegistrationType::SelfRegistered => "self_registered",
        }
    }
}

impl FromStr for RegistrationType {
    type Err = GuestPassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre_registered" => Ok(RegistrationType::PreRegistered),
            "self_registered" => Ok(RegistrationType::SelfRegistered),
            other => Err(GuestPassError::InvalidInput(format!("Unknown registration type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationSource {
    BulkImport,
    OnlineForm,
    Manual,
}

impl RegistrationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationSource::BulkImport => "bulk_import",
            RegistrationSource::OnlineForm => "online_form",
            RegistrationSource::Manual => "manual",
        }
    }

    /// Registration type implied by where the guest came from
    pub fn registration_type(self) -> RegistrationType {
        match self {
            RegistrationSource::OnlineForm => RegistrationType::SelfRegistered,
            RegistrationSource::BulkImport | RegistrationSource::Manual => RegistrationType::PreRegistered,
        }
    }
}

impl FromStr for RegistrationSource {
    type Err = GuestPassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bulk_import" => Ok(RegistrationSource::BulkImport),
            "online_form" => Ok(RegistrationSource::OnlineForm),
            "manual" => Ok(RegistrationSource::Manual),
            other => Err(GuestPassError::InvalidInput(format!("Unknown registration source: {}", other))),
        }
    }
}

/// Normalized intake values as accepted by the form validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestFields {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub home_address: Option<String>,
    pub company_name: Option<String>,
    pub guest_category: GuestCategory,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: i64,
    pub event_id: i64,
    pub guest_code: String,
    pub qr_payload: String,
    pub fields: GuestFields,
    pub registration_type: RegistrationType,
    pub registration_source: RegistrationSource,
    pub attended: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub check_in_gate: Option<String>,
    pub checked_in_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    pub fn display_name(&self) -> &str {
        self.fields.full_name.as_deref().unwrap_or(&self.guest_code)
    }
}

/// Guest row about to be inserted
#[derive(Debug, Clone)]
pub struct NewGuest {
    pub event_id: i64,
    pub guest_code: String,
    pub qr_payload: String,
    pub fields: GuestFields,
    pub registration_type: RegistrationType,
    pub registration_source: RegistrationSource,
}

/// Check-in details written once when a guest is admitted
#[derive(Debug, Clone)]
pub struct CheckInRecord {
    pub checked_in_at: DateTime<Utc>,
    pub checked_in_by: String,
    pub gate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_category_coercion() {
        assert_eq!(GuestCategory::coerce("VIP"), GuestCategory::Vip);
        assert_eq!(GuestCategory::coerce("Speaker"), GuestCategory::Speaker);
        assert_eq!(GuestCategory::coerce("vip"), GuestCategory::Regular);
        assert_eq!(GuestCategory::coerce("Royalty"), GuestCategory::Regular);
        assert!("Royalty".parse::<GuestCategory>().is_err());
    }

    #[test]
    fn test_source_implies_type() {
        assert_eq!(RegistrationSource::OnlineForm.registration_type(), RegistrationType::SelfRegistered);
        assert_eq!(RegistrationSource::BulkImport.registration_type(), RegistrationType::PreRegistered);
        assert_eq!(RegistrationSource::Manual.registration_type(), RegistrationType::PreRegistered);
        assert_eq!("manual".parse::<RegistrationSource>().unwrap(), RegistrationSource::Manual);
    }
}
