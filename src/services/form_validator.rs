//! Form schema validator
//!
//! Judges a submitted field map against an event's current form schema and
//! produces normalized guest fields or every field-level error at once.

use std::collections::BTreeMap;
use regex::Regex;
use crate::models::{CoreField, FormSchema, GuestCategory, GuestFields};
use crate::utils::errors::{FieldError, GuestPassError, Result};
use crate::utils::helpers::normalize_whitespace;

/// Raw field values as submitted by a registrant
pub type FieldSubmission = BTreeMap<String, String>;

const EMAIL_PATTERN: &str = r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$";
const CONTACT_NUMBER_PATTERN: &str = r"^[+]?[0-9\s\-()]{7,20}$";
const FULL_NAME_LENGTH: std::ops::RangeInclusive<usize> = 2..=100;

#[derive(Debug, Clone)]
pub struct FormValidator {
    email: Regex,
    contact_number: Regex,
}

impl FormValidator {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| GuestPassError::Config(format!("Invalid field pattern: {}", e)))
        };

        Ok(Self {
            email: compile(EMAIL_PATTERN)?,
            contact_number: compile(CONTACT_NUMBER_PATTERN)?,
        })
    }

    /// Validate a submission. Disabled fields and unknown keys are dropped silently.
    pub fn validate(
        &self,
        schema: &FormSchema,
        submission: &FieldSubmission,
    ) -> std::result::Result<GuestFields, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut fields = GuestFields::default();

        for field in CoreField::ALL {
            if !schema.is_enabled(field) {
                continue;
            }
            let settings = schema.settings(field);
            let Some(value) = present(submission, field.key()) else {
                if settings.required {
                    errors.push(FieldError::new(field.key(), format!("{} is required", settings.label)));
                }
                continue;
            };

            match field {
                CoreField::FullName => {
                    let name = normalize_whitespace(value);
                    if FULL_NAME_LENGTH.contains(&name.chars().count()) {
                        fields.full_name = Some(name);
                    } else {
                        errors.push(FieldError::new(
                            field.key(),
                            format!("{} must be between 2 and 100 characters", settings.label),
                        ));
                    }
                }
                CoreField::Email => {
                    let email = value.to_lowercase();
                    if self.email.is_match(&email) {
                        fields.email = Some(email);
                    } else {
                        errors.push(FieldError::new(field.key(), "Invalid email address"));
                    }
                }
                CoreField::ContactNumber => {
                    if self.contact_number.is_match(value) {
                        fields.contact_number = Some(value.to_string());
                    } else {
                        errors.push(FieldError::new(field.key(), "Invalid contact number"));
                    }
                }
                CoreField::HomeAddress => fields.home_address = Some(value.to_string()),
                CoreField::CompanyName => fields.company_name = Some(value.to_string()),
                CoreField::GuestCategory => fields.guest_category = GuestCategory::coerce(value),
            }
        }

        for custom in &schema.custom_fields {
            match present(submission, &custom.name) {
                Some(value) => {
                    fields.custom_fields.insert(custom.name.clone(), value.to_string());
                }
                None if custom.required => {
                    let label = custom.label.as_deref().unwrap_or(&custom.name);
                    errors.push(FieldError::new(custom.name.clone(), format!("{} is required", label)));
                }
                None => {}
            }
        }

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(errors)
        }
    }
}

fn present<'a>(submission: &'a FieldSubmission, key: &str) -> Option<&'a str> {
    submission
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomField, CustomFieldType};

    fn submission(pairs: &[(&str, &str)]) -> FieldSubmission {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn valid() -> FieldSubmission {
        submission(&[
            ("full_name", "  Ada   Lovelace "),
            ("email", " Ada@Example.COM "),
            ("contact_number", "+44 (20) 7946-0958"),
        ])
    }

    fn error_fields(errors: Vec<FieldError>) -> Vec<String> {
        errors.into_iter().map(|error| error.field).collect()
    }

    #[test]
    fn test_normalizes_valid_submission() {
        let validator = FormValidator::new().unwrap();
        let fields = validator.validate(&FormSchema::default(), &valid()).unwrap();
        assert_eq!(fields.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(fields.email.as_deref(), Some("ada@example.com"));
        assert_eq!(fields.contact_number.as_deref(), Some("+44 (20) 7946-0958"));
        assert_eq!(fields.guest_category, GuestCategory::Regular);
        assert!(fields.company_name.is_none());
    }

    #[test]
    fn test_reports_every_missing_required_field() {
        let validator = FormValidator::new().unwrap();
        let errors = validator
            .validate(&FormSchema::default(), &submission(&[("full_name", "   ")]))
            .unwrap_err();
        assert_eq!(error_fields(errors), vec!["full_name", "email", "contact_number"]);
    }

    #[test]
    fn test_required_company_name() {
        let validator = FormValidator::new().unwrap();
        let mut schema = FormSchema::default();
        schema.company_name.required = true;
        let errors = validator.validate(&schema, &valid()).unwrap_err();
        assert_eq!(error_fields(errors), vec!["company_name"]);
    }

    #[test]
    fn test_format_rules() {
        let validator = FormValidator::new().unwrap();
        let mut input = valid();
        input.insert("email".to_string(), "not-an-email".to_string());
        input.insert("contact_number".to_string(), "call me".to_string());
        input.insert("full_name".to_string(), "A".to_string());
        let errors = validator.validate(&FormSchema::default(), &input).unwrap_err();
        assert_eq!(error_fields(errors), vec!["full_name", "email", "contact_number"]);

        let mut input = valid();
        input.insert("full_name".to_string(), "x".repeat(101));
        assert!(validator.validate(&FormSchema::default(), &input).is_err());
        input.insert("full_name".to_string(), "x".repeat(100));
        assert!(validator.validate(&FormSchema::default(), &input).is_ok());
    }

    #[test]
    fn test_contact_number_length_bounds() {
        let validator = FormValidator::new().unwrap();
        let mut input = valid();
        input.insert("contact_number".to_string(), "123456".to_string());
        assert!(validator.validate(&FormSchema::default(), &input).is_err());
        input.insert("contact_number".to_string(), "1234567".to_string());
        assert!(validator.validate(&FormSchema::default(), &input).is_ok());
    }

    #[test]
    fn test_unknown_category_becomes_regular() {
        let validator = FormValidator::new().unwrap();
        let mut input = valid();
        input.insert("guest_category".to_string(), "Sponsor".to_string());
        let fields = validator.validate(&FormSchema::default(), &input).unwrap();
        assert_eq!(fields.guest_category, GuestCategory::Sponsor);

        input.insert("guest_category".to_string(), "Royalty".to_string());
        let fields = validator.validate(&FormSchema::default(), &input).unwrap();
        assert_eq!(fields.guest_category, GuestCategory::Regular);
    }

    #[test]
    fn test_disabled_field_is_ignored() {
        let validator = FormValidator::new().unwrap();
        let mut schema = FormSchema::default();
        schema.home_address.enabled = false;
        schema.home_address.required = true;
        let mut input = valid();
        input.insert("home_address".to_string(), "1 Analytical Way".to_string());
        let fields = validator.validate(&schema, &input).unwrap();
        assert!(fields.home_address.is_none());
    }

    #[test]
    fn test_disabled_core_field_treated_as_enabled() {
        let validator = FormValidator::new().unwrap();
        let mut schema = FormSchema::default();
        schema.email.enabled = false;
        let mut input = valid();
        input.remove("email");
        let errors = validator.validate(&schema, &input).unwrap_err();
        assert_eq!(error_fields(errors), vec!["email"]);
    }

    #[test]
    fn test_custom_fields_presence_only() {
        let validator = FormValidator::new().unwrap();
        let mut schema = FormSchema::default();
        let mut dietary = CustomField::new("dietary", CustomFieldType::Text, true);
        dietary.label = Some("Dietary needs".to_string());
        schema.custom_fields = vec![dietary, CustomField::new("notes", CustomFieldType::Textarea, false)];

        let errors = validator.validate(&schema, &valid()).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("dietary", "Dietary needs is required")]);

        let mut input = valid();
        input.insert("dietary".to_string(), " vegan ".to_string());
        input.insert("unexpected".to_string(), "dropped".to_string());
        let fields = validator.validate(&schema, &input).unwrap();
        assert_eq!(fields.custom_fields.get("dietary").map(String::as_str), Some("vegan"));
        assert!(!fields.custom_fields.contains_key("notes"));
        assert!(!fields.custom_fields.contains_key("unexpected"));
    }
}
