//! Caller-held account projection with optimistic patches and reconciliation.
//!
//! Each mutation applies a local patch once the provider has confirmed it,
//! flags the projection stale, then re-fetches. The re-fetch is the
//! authoritative overwrite; the patch only covers the gap until it lands.
//! A failed re-fetch leaves the patch in place and the stale flag set.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::accounts::UnlinkGate;
use crate::avatar::fallback_initial;
use crate::caller::Caller;
use crate::error::ErrorKind;
use crate::facade::IdentityFacade;
use crate::types::{
    AccountSnapshot, ActionResult, AvatarImage, AvatarUpload, EmailAddressRecord,
    ExternalAccountRecord, ProfilePatch, SessionRecord, VerificationOutcome,
};

/// Single-owner projection of one user's identity state.
///
/// Mutating methods take `&mut self`, so at most one action per view is in
/// flight at a time.
pub struct AccountView {
    facade: Arc<IdentityFacade>,
    caller: Caller,
    sessions: Vec<SessionRecord>,
    account: Option<AccountSnapshot>,
    /// Sessions revoked through this view; a lagging listing never brings
    /// them back.
    revoked: HashSet<String>,
    unlink_gate: UnlinkGate,
    sessions_stale: bool,
    account_stale: bool,
}

impl AccountView {
    pub fn new(facade: Arc<IdentityFacade>, caller: Caller) -> Self {
        Self {
            facade,
            caller,
            sessions: Vec::new(),
            account: None,
            revoked: HashSet::new(),
            unlink_gate: UnlinkGate::new(),
            sessions_stale: true,
            account_stale: true,
        }
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    pub fn account(&self) -> Option<&AccountSnapshot> {
        self.account.as_ref()
    }

    pub fn emails(&self) -> &[EmailAddressRecord] {
        self.account
            .as_ref()
            .map(|a| a.emails.as_slice())
            .unwrap_or(&[])
    }

    pub fn external_accounts(&self) -> &[ExternalAccountRecord] {
        self.account
            .as_ref()
            .map(|a| a.external_accounts.as_slice())
            .unwrap_or(&[])
    }

    pub fn available_providers(&self) -> Vec<String> {
        self.facade.available_providers(self.external_accounts())
    }

    /// Empty when there is no uploaded image.
    pub fn image_url(&self) -> &str {
        self.account.as_ref().map_or("", |a| a.image_url.as_str())
    }

    pub fn avatar_initial(&self) -> char {
        let account = self.account.as_ref();
        let display_name = account.and_then(|a| a.display_name.as_deref());
        let email = account
            .and_then(AccountSnapshot::primary_email)
            .map(|e| e.email_address.as_str());
        fallback_initial(display_name, email)
    }

    /// True while an optimistic patch has not been reconciled.
    pub fn is_stale(&self) -> bool {
        self.sessions_stale || self.account_stale
    }

    pub fn pending_unlink(&self) -> Option<&str> {
        self.unlink_gate.pending()
    }

    /// Store the code the user is typing for `email_id`.
    pub fn set_pending_code(&mut self, email_id: &str, code: impl Into<String>) {
        if let Some(email) = self.email_mut(email_id) {
            email.pending_code = Some(code.into());
        }
    }

    /// Re-fetch both the account and the session list.
    pub async fn refresh(&mut self) -> ActionResult<()> {
        let account = self.refresh_account().await;
        let sessions = self.refresh_sessions().await;
        if !account.ok {
            return account;
        }
        sessions
    }

    pub async fn refresh_sessions(&mut self) -> ActionResult<()> {
        match self.facade.list_sessions(&self.caller).await.into_result() {
            Ok(listed) => {
                let revoked = &self.revoked;
                self.sessions = listed
                    .into_iter()
                    .filter(|s| !revoked.contains(&s.id))
                    .collect();
                self.sessions_stale = false;
                ActionResult::success(())
            }
            Err(kind) => ActionResult::failure(kind),
        }
    }

    pub async fn refresh_account(&mut self) -> ActionResult<()> {
        match self.facade.load_account(&self.caller).await.into_result() {
            Ok(snapshot) => {
                self.account = Some(snapshot);
                self.account_stale = false;
                ActionResult::success(())
            }
            Err(kind) => ActionResult::failure(kind),
        }
    }

    /// Revoke, drop the session locally at once, then reconcile.
    pub async fn revoke_session(&mut self, session_id: &str) -> ActionResult<()> {
        let result = self.facade.revoke_session(&self.caller, session_id).await;
        if result.ok {
            self.revoked.insert(session_id.to_string());
            self.sessions.retain(|s| s.id != session_id);
            self.sessions_stale = true;
            self.reconcile_sessions().await;
        }
        result
    }

    pub async fn add_email(&mut self, address: &str) -> ActionResult<EmailAddressRecord> {
        let result = self.facade.add_email(&self.caller, address).await;
        if let (Some(created), Some(account)) = (result.data(), self.account.as_mut()) {
            account.emails.push(created.clone());
            self.account_stale = true;
        }
        if result.ok {
            self.reconcile_account().await;
        }
        result
    }

    pub async fn resend_verification(&mut self, email_id: &str) -> ActionResult<()> {
        self.facade.resend_verification(&self.caller, email_id).await
    }

    pub async fn attempt_verification(
        &mut self,
        email_id: &str,
        code: &str,
    ) -> ActionResult<VerificationOutcome> {
        let result = self
            .facade
            .attempt_verification(&self.caller, email_id, code)
            .await;
        let verified = result.data().is_some_and(|o| o.verified);
        if let Some(email) = self.email_mut(email_id) {
            if verified {
                email.verified = true;
                email.pending_code = None;
            }
        }
        if verified {
            self.account_stale = true;
            self.reconcile_account().await;
        }
        result
    }

    /// Promote a verified address. Local `primary` flags change only after
    /// the provider confirms.
    pub async fn set_primary_email(&mut self, email_id: &str) -> ActionResult<()> {
        let current = self.emails().to_vec();
        let result = self
            .facade
            .set_primary_email(&self.caller, &current, email_id)
            .await;
        match result.into_result() {
            Ok(updated) => {
                if let Some(account) = self.account.as_mut() {
                    account.emails = updated;
                    account.primary_email_id = Some(email_id.to_string());
                }
                self.account_stale = true;
                self.reconcile_account().await;
                ActionResult::success(())
            }
            Err(kind) => ActionResult::failure(kind),
        }
    }

    pub async fn update_profile(&mut self, patch: &ProfilePatch) -> ActionResult<()> {
        match self
            .facade
            .update_profile(&self.caller, patch)
            .await
            .into_result()
        {
            Ok(snapshot) => {
                self.account = Some(snapshot);
                self.account_stale = false;
                ActionResult::success(())
            }
            Err(kind) => ActionResult::failure(kind),
        }
    }

    /// Start linking, wait the configured delay, then refresh so a flow that
    /// completed synchronously shows up.
    pub async fn link_external_account(&mut self, provider_key: &str) -> ActionResult<()> {
        let result = self
            .facade
            .link_external_account(&self.caller, provider_key)
            .await;
        if result.ok {
            tokio::time::sleep(self.facade.link_refresh_delay()).await;
            self.account_stale = true;
            self.reconcile_account().await;
        }
        result
    }

    /// First click of an unlink. No network call.
    pub fn request_unlink(&mut self, account_id: &str) {
        self.unlink_gate.request(account_id);
    }

    pub fn cancel_unlink(&mut self) {
        self.unlink_gate.cancel();
    }

    /// Second click. Fires the unlink only if it was requested for this id;
    /// the gate is reset whatever the outcome.
    pub async fn confirm_unlink(&mut self, account_id: &str) -> ActionResult<()> {
        if let Err(error) = self.caller.require_user() {
            self.unlink_gate.cancel();
            return ActionResult::failure(error.kind());
        }
        let confirmed = match self.unlink_gate.confirm(account_id) {
            Ok(confirmed) => confirmed,
            Err(error) => return ActionResult::failure(error.kind()),
        };

        let result = self
            .facade
            .unlink_external_account(&self.caller, confirmed)
            .await;
        if result.ok {
            if let Some(account) = self.account.as_mut() {
                account.external_accounts.retain(|a| a.id != account_id);
            }
            self.account_stale = true;
            self.reconcile_account().await;
        }
        result
    }

    pub async fn upload_avatar(&mut self, upload: &AvatarUpload) -> ActionResult<AvatarImage> {
        let result = self.facade.upload_avatar(&self.caller, upload).await;
        if let (Some(image), Some(account)) = (result.data(), self.account.as_mut()) {
            account.image_url = image.image_url.clone();
        }
        result
    }

    pub async fn remove_avatar(&mut self) -> ActionResult<()> {
        let result = self.facade.remove_avatar(&self.caller).await;
        if result.ok {
            if let Some(account) = self.account.as_mut() {
                account.image_url.clear();
            }
        }
        result
    }

    fn email_mut(&mut self, email_id: &str) -> Option<&mut EmailAddressRecord> {
        self.account
            .as_mut()?
            .emails
            .iter_mut()
            .find(|e| e.id == email_id)
    }

    async fn reconcile_sessions(&mut self) {
        let outcome = self.refresh_sessions().await;
        log_reconcile("sessions", outcome.error);
    }

    async fn reconcile_account(&mut self) {
        let outcome = self.refresh_account().await;
        log_reconcile("account", outcome.error);
    }
}

fn log_reconcile(target: &'static str, error: Option<ErrorKind>) {
    match error {
        None => debug!(target_state = target, "projection reconciled"),
        Some(kind) => warn!(
            target_state = target,
            kind = %kind,
            "reconcile failed, keeping optimistic state"
        ),
    }
}
