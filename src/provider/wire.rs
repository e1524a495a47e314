//! Raw provider payloads. Components normalize these into `crate::types`.

use serde::Deserialize;
use serde_json::Value;

/// List endpoints answer with a bare array or a `{ "data": [...] }` page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireList<T> {
    Bare(Vec<T>),
    Paged { data: Vec<T> },
}

impl<T> WireList<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Paged { data } => data,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireSession {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Epoch seconds, epoch millis, or an RFC 3339 string depending on the
    /// endpoint; see `sessions::normalize_timestamp`.
    #[serde(default, alias = "latest_activity_at")]
    pub last_active_at: Option<Value>,
    #[serde(default)]
    pub latest_activity: Option<WireActivity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireActivity {
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub browser_name: Option<String>,
    #[serde(default)]
    pub browser_version: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub is_mobile: Option<bool>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireVerification {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireEmailAddress {
    pub id: String,
    pub email_address: String,
    #[serde(default)]
    pub verification: Option<WireVerification>,
}

impl WireEmailAddress {
    pub fn is_verified(&self) -> bool {
        self.verification
            .as_ref()
            .and_then(|v| v.status.as_deref())
            .is_some_and(|status| status == "verified")
    }
}

/// Attempt-verification response. The status shows up at the top level or
/// nested under `verification`, depending on the endpoint revision.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireVerificationAttempt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub verification: Option<WireVerification>,
}

impl WireVerificationAttempt {
    pub fn status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .or_else(|| self.verification.as_ref()?.status.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireExternalAccount {
    pub id: String,
    pub provider: String,
    #[serde(default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<WireEmailAddress>,
    #[serde(default)]
    pub external_accounts: Vec<WireExternalAccount>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// When `false`, `image_url` points at a provider-generated default.
    #[serde(default)]
    pub has_image: Option<bool>,
}

impl WireUser {
    /// Uploaded image URL, or empty when the user has none.
    pub fn uploaded_image_url(&self) -> String {
        if self.has_image == Some(false) {
            return String::new();
        }
        self.image_url.clone().unwrap_or_default()
    }
}
