//! Account snapshot loading and profile field updates.

use std::sync::Arc;

use tracing::info;

use crate::accounts::project_external_account;
use crate::caller::Caller;
use crate::emails::project_email;
use crate::error::IdentityError;
use crate::provider::wire::WireUser;
use crate::provider::IdentityProvider;
use crate::types::{AccountSnapshot, ProfilePatch, UserPatch};

const MAX_NAME_CHARS: usize = 256;

pub struct ProfileService {
    provider: Arc<dyn IdentityProvider>,
}

impl ProfileService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Full re-fetch of the caller's account. This is the authoritative
    /// overwrite for any optimistic local patch.
    pub async fn load(&self, caller: &Caller) -> Result<AccountSnapshot, IdentityError> {
        let user_id = caller.require_user()?;
        let user = self.provider.get_user(user_id).await?;
        Ok(project_user(&user))
    }

    pub async fn update(
        &self,
        caller: &Caller,
        patch: &ProfilePatch,
    ) -> Result<AccountSnapshot, IdentityError> {
        let user_id = caller.require_user()?;
        let patch = validate_profile_patch(patch)?;
        let user = self
            .provider
            .update_user(user_id, &UserPatch::Profile(patch))
            .await?;
        info!("profile updated");
        Ok(project_user(&user))
    }
}

/// Trim names and reject blank or oversized ones.
pub fn validate_profile_patch(patch: &ProfilePatch) -> Result<ProfilePatch, IdentityError> {
    if patch.is_empty() {
        return Err(IdentityError::InvalidProfile("nothing to update".to_string()));
    }
    Ok(ProfilePatch {
        first_name: patch
            .first_name
            .as_deref()
            .map(|n| clean_name("first_name", n))
            .transpose()?,
        last_name: patch
            .last_name
            .as_deref()
            .map(|n| clean_name("last_name", n))
            .transpose()?,
    })
}

fn clean_name(field: &str, raw: &str) -> Result<String, IdentityError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(IdentityError::InvalidProfile(format!("{field} is blank")));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(IdentityError::InvalidProfile(format!("{field} is too long")));
    }
    Ok(name.to_string())
}

/// Project a provider user into the local snapshot.
pub fn project_user(user: &WireUser) -> AccountSnapshot {
    let primary_id = user.primary_email_address_id.as_deref();
    AccountSnapshot {
        user_id: user.id.clone(),
        display_name: display_name(user),
        primary_email_id: user.primary_email_address_id.clone(),
        emails: user
            .email_addresses
            .iter()
            .map(|e| project_email(e, primary_id))
            .collect(),
        external_accounts: user
            .external_accounts
            .iter()
            .map(project_external_account)
            .collect(),
        image_url: user.uploaded_image_url(),
    }
}

fn display_name(user: &WireUser) -> Option<String> {
    let full = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !full.is_empty() {
        return Some(full);
    }
    user.username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}
