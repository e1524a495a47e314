//! Email address records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddressRecord {
    pub id: String,
    pub email_address: String,
    pub verified: bool,
    pub primary: bool,
    /// Code the user is typing for an in-flight verification. UI-local only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_code: Option<String>,
}

impl EmailAddressRecord {
    /// A freshly added address: never verified, never primary.
    pub fn unverified(id: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email_address: email_address.into(),
            verified: false,
            primary: false,
            pending_code: None,
        }
    }
}

/// Outcome of a verification code attempt.
///
/// `verified: false` is a normal answer ("not yet"), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub verified: bool,
}
