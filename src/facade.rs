//! Inbound command surface. Every command returns an [`ActionResult`].

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::accounts::{ConfirmedUnlink, ExternalAccountLinker, LinkLauncher};
use crate::avatar::AvatarManager;
use crate::caller::Caller;
use crate::config::ProviderConfig;
use crate::emails::EmailLifecycle;
use crate::error::IdentityError;
use crate::profile::ProfileService;
use crate::provider::{HttpIdentityProvider, IdentityProvider};
use crate::sessions::SessionRegistry;
use crate::types::{
    AccountSnapshot, ActionResult, AvatarImage, AvatarUpload, EmailAddressRecord,
    ExternalAccountRecord, ProfilePatch, SessionRecord, VerificationOutcome,
};

/// Identity and session lifecycle facade.
///
/// Holds no per-user state; the caller's identity is passed to every command
/// and the projection lives with the caller (see [`crate::view::AccountView`]).
///
/// # Example
/// ```no_run
/// use warden::prelude::*;
///
/// # async fn example() -> warden::error::Result<()> {
/// let facade = IdentityFacade::new(ProviderConfig::from_env())?;
/// let caller = Caller::new("user_123").with_session_id("sess_abc");
///
/// let listed = facade.list_sessions(&caller).await;
/// if let Some(sessions) = listed.data() {
///     for session in sessions {
///         println!("{} current={}", session.id, session.current);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct IdentityFacade {
    sessions: SessionRegistry,
    emails: EmailLifecycle,
    accounts: ExternalAccountLinker,
    avatar: AvatarManager,
    profile: ProfileService,
    link_refresh_delay: Duration,
}

impl IdentityFacade {
    /// Build over the HTTP provider client.
    pub fn new(config: ProviderConfig) -> Result<Self, IdentityError> {
        let provider = Arc::new(HttpIdentityProvider::new(config.clone())?);
        Ok(Self::with_provider(provider, &config))
    }

    /// Build over any provider implementation.
    pub fn with_provider(provider: Arc<dyn IdentityProvider>, config: &ProviderConfig) -> Self {
        Self {
            sessions: SessionRegistry::new(Arc::clone(&provider)),
            emails: EmailLifecycle::new(Arc::clone(&provider)),
            accounts: ExternalAccountLinker::new(Arc::clone(&provider), config.known_providers()),
            avatar: AvatarManager::new(Arc::clone(&provider)),
            profile: ProfileService::new(provider),
            link_refresh_delay: config.link_refresh_delay(),
        }
    }

    pub fn with_link_launcher(mut self, launcher: Arc<dyn LinkLauncher>) -> Self {
        self.accounts = self.accounts.with_launcher(launcher);
        self
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn emails(&self) -> &EmailLifecycle {
        &self.emails
    }

    pub fn accounts(&self) -> &ExternalAccountLinker {
        &self.accounts
    }

    pub fn avatar(&self) -> &AvatarManager {
        &self.avatar
    }

    pub fn profile(&self) -> &ProfileService {
        &self.profile
    }

    pub fn link_refresh_delay(&self) -> Duration {
        self.link_refresh_delay
    }

    pub async fn list_sessions(&self, caller: &Caller) -> ActionResult<Vec<SessionRecord>> {
        settle("list_sessions", self.sessions.list(caller).await)
    }

    pub async fn revoke_session(&self, caller: &Caller, session_id: &str) -> ActionResult<()> {
        settle(
            "revoke_session",
            self.sessions.revoke(caller, session_id).await,
        )
    }

    pub async fn load_account(&self, caller: &Caller) -> ActionResult<AccountSnapshot> {
        settle("load_account", self.profile.load(caller).await)
    }

    pub async fn update_profile(
        &self,
        caller: &Caller,
        patch: &ProfilePatch,
    ) -> ActionResult<AccountSnapshot> {
        settle("update_profile", self.profile.update(caller, patch).await)
    }

    pub async fn add_email(
        &self,
        caller: &Caller,
        address: &str,
    ) -> ActionResult<EmailAddressRecord> {
        settle("add_email", self.emails.add(caller, address).await)
    }

    pub async fn resend_verification(&self, caller: &Caller, email_id: &str) -> ActionResult<()> {
        settle(
            "resend_verification",
            self.emails.resend(caller, email_id).await,
        )
    }

    pub async fn attempt_verification(
        &self,
        caller: &Caller,
        email_id: &str,
        code: &str,
    ) -> ActionResult<VerificationOutcome> {
        settle(
            "attempt_verification",
            self.emails.attempt(caller, email_id, code).await,
        )
    }

    /// On success `data` is `emails` with `primary` re-derived by id.
    pub async fn set_primary_email(
        &self,
        caller: &Caller,
        emails: &[EmailAddressRecord],
        email_id: &str,
    ) -> ActionResult<Vec<EmailAddressRecord>> {
        settle(
            "set_primary_email",
            self.emails.set_primary(caller, emails, email_id).await,
        )
    }

    pub fn available_providers(&self, linked: &[ExternalAccountRecord]) -> Vec<String> {
        self.accounts.available(linked)
    }

    pub async fn link_external_account(
        &self,
        caller: &Caller,
        provider_key: &str,
    ) -> ActionResult<()> {
        settle(
            "link_external_account",
            self.accounts.link(caller, provider_key).await,
        )
    }

    pub async fn unlink_external_account(
        &self,
        caller: &Caller,
        confirmed: ConfirmedUnlink,
    ) -> ActionResult<()> {
        settle(
            "unlink_external_account",
            self.accounts.unlink(caller, confirmed).await,
        )
    }

    pub async fn upload_avatar(
        &self,
        caller: &Caller,
        upload: &AvatarUpload,
    ) -> ActionResult<AvatarImage> {
        settle("upload_avatar", self.avatar.upload(caller, upload).await)
    }

    pub async fn remove_avatar(&self, caller: &Caller) -> ActionResult<()> {
        settle("remove_avatar", self.avatar.remove(caller).await)
    }
}

fn settle<T>(operation: &'static str, result: Result<T, IdentityError>) -> ActionResult<T> {
    if let Err(error) = &result {
        warn!(
            operation,
            kind = %error.kind(),
            error = %error,
            preview = error.preview().unwrap_or_default(),
            "identity action failed"
        );
    }
    result.into()
}
