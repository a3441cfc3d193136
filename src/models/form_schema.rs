//! Per-event intake form configuration
//!
//! Core fields are fixed and addressed through [`CoreField`]; operators may append
//! any number of typed custom fields.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::utils::errors::FieldError;

/// Built-in intake fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreField {
    FullName,
    Email,
    ContactNumber,
    HomeAddress,
    CompanyName,
    GuestCategory,
}

impl CoreField {
    pub const ALL: [CoreField; 6] = [
        CoreField::FullName,
        CoreField::Email,
        CoreField::ContactNumber,
        CoreField::HomeAddress,
        CoreField::CompanyName,
        CoreField::GuestCategory,
    ];

    /// Submission key for this field
    pub fn key(self) -> &'static str {
        match self {
            CoreField::FullName => "full_name",
            CoreField::Email => "email",
            CoreField::ContactNumber => "contact_number",
            CoreField::HomeAddress => "home_address",
            CoreField::CompanyName => "company_name",
            CoreField::GuestCategory => "guest_category",
        }
    }

    /// Mandatory fields can never be disabled, only relabelled or made optional.
    pub fn is_mandatory(self) -> bool {
        matches!(self, CoreField::FullName | CoreField::Email | CoreField::ContactNumber)
    }

    fn default_label(self) -> &'static str {
        match self {
            CoreField::FullName => "Full Name",
            CoreField::Email => "Email Address",
            CoreField::ContactNumber => "Contact Number",
            CoreField::HomeAddress => "Home Address",
            CoreField::CompanyName => "Company Name",
            CoreField::GuestCategory => "Guest Category",
        }
    }
}

impl std::fmt::Display for CoreField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSettings {
    pub enabled: bool,
    pub required: bool,
    pub label: String,
}

impl FieldSettings {
    fn defaults_for(field: CoreField) -> Self {
        Self {
            enabled: true,
            required: field.is_mandatory(),
            label: field.default_label().to_string(),
        }
    }
}

/// Input types an operator may choose for a custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldType {
    Text,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Number,
    Date,
    Email,
    Phone,
}

impl CustomFieldType {
    pub fn takes_options(self) -> bool {
        matches!(self, CustomFieldType::Select | CustomFieldType::Radio | CustomFieldType::Checkbox)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl CustomField {
    pub fn new(name: impl Into<String>, field_type: CustomFieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            required,
            label: None,
            options: None,
        }
    }
}

/// Intake form configuration for one event.
///
/// Stored schemas may omit core fields; missing entries take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default = "default_full_name")]
    pub full_name: FieldSettings,
    #[serde(default = "default_email")]
    pub email: FieldSettings,
    #[serde(default = "default_contact_number")]
    pub contact_number: FieldSettings,
    #[serde(default = "default_home_address")]
    pub home_address: FieldSettings,
    #[serde(default = "default_company_name")]
    pub company_name: FieldSettings,
    #[serde(default = "default_guest_category")]
    pub guest_category: FieldSettings,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

fn default_full_name() -> FieldSettings {
    FieldSettings::defaults_for(CoreField::FullName)
}

fn default_email() -> FieldSettings {
    FieldSettings::defaults_for(CoreField::Email)
}

fn default_contact_number() -> FieldSettings {
    FieldSettings::defaults_for(CoreField::ContactNumber)
}

fn default_home_address() -> FieldSettings {
    FieldSettings::defaults_for(CoreField::HomeAddress)
}

fn default_company_name() -> FieldSettings {
    FieldSettings::defaults_for(CoreField::CompanyName)
}

fn default_guest_category() -> FieldSettings {
    FieldSettings::defaults_for(CoreField::GuestCategory)
}

impl Default for FormSchema {
    fn default() -> Self {
        Self {
            full_name: default_full_name(),
            email: default_email(),
            contact_number: default_contact_number(),
            home_address: default_home_address(),
            company_name: default_company_name(),
            guest_category: default_guest_category(),
            custom_fields: Vec::new(),
        }
    }
}

impl FormSchema {
    pub fn settings(&self, field: CoreField) -> &FieldSettings {
        match field {
            CoreField::FullName => &self.full_name,
            CoreField::Email => &self.email,
            CoreField::ContactNumber => &self.contact_number,
            CoreField::HomeAddress => &self.home_address,
            CoreField::CompanyName => &self.company_name,
            CoreField::GuestCategory => &self.guest_category,
        }
    }

    /// Whether the field takes part in validation. Mandatory fields count as
    /// enabled even if a stored schema says otherwise.
    pub fn is_enabled(&self, field: CoreField) -> bool {
        field.is_mandatory() || self.settings(field).enabled
    }

    pub fn collects_email(&self) -> bool {
        self.is_enabled(CoreField::Email)
    }

    /// Check the schema definition itself, as an operator would submit it.
    pub fn check_definition(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        for field in CoreField::ALL {
            let settings = self.settings(field);
            if field.is_mandatory() && !settings.enabled {
                errors.push(FieldError::new(field.key(), "core field cannot be disabled"));
            }
            if settings.label.trim().is_empty() {
                errors.push(FieldError::new(field.key(), "label must not be empty"));
            }
        }

        let mut seen = HashSet::new();
        for (index, custom) in self.custom_fields.iter().enumerate() {
            let name = custom.name.trim();
            if name.is_empty() {
                errors.push(FieldError::new(format!("custom_fields[{}]", index), "name must not be empty"));
                continue;
            }
            // Submission keys are matched verbatim.
            if name != custom.name {
                errors.push(FieldError::new(name, "name must not start or end with whitespace"));
            }
            if CoreField::ALL.iter().any(|core| core.key() == name) {
                errors.push(FieldError::new(name, "name collides with a core field"));
            }
            if !seen.insert(name.to_string()) {
                errors.push(FieldError::new(name, "duplicate custom field name"));
            }
            if custom.field_type.takes_options()
                && custom.options.as_ref().map_or(true, |options| options.is_empty())
            {
                errors.push(FieldError::new(name, "choice fields need at least one option"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
