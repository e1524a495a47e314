//! Linked external (OAuth) accounts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalAccountRecord {
    pub id: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

impl ExternalAccountRecord {
    /// Comparable provider key, e.g. `oauth_Google` -> `google`.
    pub fn provider_key(&self) -> String {
        normalize_provider_key(&self.provider)
    }
}

/// Lower-case a provider key and drop the `oauth_` strategy prefix.
pub fn normalize_provider_key(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    match lowered.strip_prefix("oauth_") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}
