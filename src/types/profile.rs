//! Account-level projection and user patches.

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::{EmailAddressRecord, ExternalAccountRecord};

/// Full re-fetched view of the caller's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub user_id: String,
    pub display_name: Option<String>,
    pub primary_email_id: Option<String>,
    pub emails: Vec<EmailAddressRecord>,
    pub external_accounts: Vec<ExternalAccountRecord>,
    /// Empty when the user has no uploaded image.
    pub image_url: String,
}

impl AccountSnapshot {
    pub fn primary_email(&self) -> Option<&EmailAddressRecord> {
        self.emails.iter().find(|e| e.primary)
    }
}

/// Editable profile fields. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Body of a patch-user call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UserPatch {
    PrimaryEmail { primary_email_address_id: String },
    Profile(ProfilePatch),
}
