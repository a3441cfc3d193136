//! Credential generation and QR payload codec
//!
//! A credential is a human-shareable guest code plus a base64url encoded JSON
//! document binding that code to its event. The payload layout is a wire
//! contract with printed tickets and must stay backward compatible.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::config::CredentialConfig;
use crate::models::RegistrationSource;
use crate::utils::errors::{GuestPassError, Result};
use crate::utils::helpers::{generate_random_string, to_base36};

const SUFFIX_LENGTH: usize = 4;

/// Document embedded in the QR code. Unknown fields are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub guest_code: String,
    pub event_id: i64,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub guest_code: String,
    pub qr_payload: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CredentialService {
    config: CredentialConfig,
}

impl CredentialService {
    pub fn new(config: CredentialConfig) -> Self {
        Self { config }
    }

    /// Issue a fresh credential for a guest of `event_id`
    pub fn issue(&self, source: RegistrationSource, event_id: i64) -> Result<Credential> {
        self.issue_at(source, event_id, Utc::now())
    }

    pub fn issue_at(&self, source: RegistrationSource, event_id: i64, issued_at: DateTime<Utc>) -> Result<Credential> {
        let guest_code = self.guest_code_at(source, issued_at);
        let qr_payload = encode_payload(&QrPayload {
            guest_code: guest_code.clone(),
            event_id,
            issued_at,
        })?;

        Ok(Credential {
            guest_code,
            qr_payload,
            issued_at,
        })
    }

    /// `{prefix}-{base36 millis}-{4 random uppercase alnum}`
    pub fn guest_code_at(&self, source: RegistrationSource, at: DateTime<Utc>) -> String {
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or_default();
        format!(
            "{}-{}-{}",
            self.config.prefix_for(source),
            to_base36(millis),
            generate_random_string(SUFFIX_LENGTH)
        )
    }
}

pub fn encode_payload(payload: &QrPayload) -> Result<String> {
    let json = serde_json::to_vec(payload)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_payload(encoded: &str) -> Result<QrPayload> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|e| GuestPassError::InvalidCredential(format!("payload is not base64url: {}", e)))?;
    let payload: QrPayload = serde_json::from_slice(&bytes)
        .map_err(|e| GuestPassError::InvalidCredential(format!("payload is not a credential document: {}", e)))?;

    if payload.guest_code.is_empty() {
        return Err(GuestPassError::InvalidCredential("payload has an empty guest code".to_string()));
    }
    Ok(payload)
}
