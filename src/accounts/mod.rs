//! External (OAuth) account linking and unlinking.

pub mod gate;

pub use gate::{ConfirmedUnlink, UnlinkGate};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::caller::Caller;
use crate::error::IdentityError;
use crate::provider::wire::WireExternalAccount;
use crate::provider::IdentityProvider;
use crate::types::{normalize_provider_key, ExternalAccountRecord};

/// Client-side capability that starts an OAuth linking redirect.
///
/// Completion happens out of band; the provider redirects back and the next
/// refresh shows the new account.
#[async_trait]
pub trait LinkLauncher: Send + Sync {
    async fn start_link(&self, provider_key: &str) -> Result<(), IdentityError>;
}

pub struct ExternalAccountLinker {
    provider: Arc<dyn IdentityProvider>,
    launcher: Option<Arc<dyn LinkLauncher>>,
    known_providers: Vec<String>,
}

impl ExternalAccountLinker {
    pub fn new(provider: Arc<dyn IdentityProvider>, known_providers: &[String]) -> Self {
        Self {
            provider,
            launcher: None,
            known_providers: known_providers
                .iter()
                .map(|p| normalize_provider_key(p))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Install the linking capability. Without one, [`link`](Self::link)
    /// fails fast with `link_unsupported`.
    pub fn with_launcher(mut self, launcher: Arc<dyn LinkLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    pub fn can_link(&self) -> bool {
        self.launcher.is_some()
    }

    pub fn known_providers(&self) -> &[String] {
        &self.known_providers
    }

    /// Known providers not yet linked, compared case-insensitively.
    pub fn available(&self, linked: &[ExternalAccountRecord]) -> Vec<String> {
        available_providers(&self.known_providers, linked)
    }

    /// Start the out-of-band linking flow for `provider_key`.
    pub async fn link(&self, caller: &Caller, provider_key: &str) -> Result<(), IdentityError> {
        caller.require_user()?;
        let launcher = self.launcher.as_ref().ok_or_else(|| {
            IdentityError::LinkUnsupported(
                "no client-side linking capability is installed".to_string(),
            )
        })?;
        let key = normalize_provider_key(provider_key);
        if !self.known_providers.contains(&key) {
            return Err(IdentityError::UnknownProvider(provider_key.to_string()));
        }

        launcher.start_link(&key).await?;
        info!(provider = %key, "external account link started");
        Ok(())
    }

    /// Remove a linked account. Requires a token from [`UnlinkGate::confirm`].
    pub async fn unlink(
        &self,
        caller: &Caller,
        confirmed: ConfirmedUnlink,
    ) -> Result<(), IdentityError> {
        let user_id = caller.require_user()?;
        self.provider
            .delete_external_account(user_id, confirmed.account_id())
            .await?;
        info!(account_id = confirmed.account_id(), "external account unlinked");
        Ok(())
    }
}

/// All `known` keys minus the ones already present in `linked`.
pub fn available_providers(known: &[String], linked: &[ExternalAccountRecord]) -> Vec<String> {
    let linked: Vec<String> = linked.iter().map(ExternalAccountRecord::provider_key).collect();
    known
        .iter()
        .map(|k| normalize_provider_key(k))
        .filter(|k| !linked.contains(k))
        .collect()
}

pub fn project_external_account(wire: &WireExternalAccount) -> ExternalAccountRecord {
    ExternalAccountRecord {
        id: wire.id.clone(),
        provider: wire.provider.clone(),
        email_address: wire.email_address.clone(),
    }
}
