//! Two-step confirmation for destructive unlinks.

use crate::error::IdentityError;

/// Proof that the user confirmed unlinking one account.
///
/// Only [`UnlinkGate::confirm`] can produce one, so the network call in
/// [`ExternalAccountLinker::unlink`](super::ExternalAccountLinker::unlink)
/// cannot fire on a single click.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmedUnlink {
    account_id: String,
}

impl ConfirmedUnlink {
    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

/// Ephemeral request → confirm state. Never persisted.
#[derive(Debug, Default)]
pub struct UnlinkGate {
    pending: Option<String>,
}

impl UnlinkGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// First click: arm the gate for `account_id`, replacing any other.
    pub fn request(&mut self, account_id: impl Into<String>) {
        self.pending = Some(account_id.into());
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_pending(&self, account_id: &str) -> bool {
        self.pending.as_deref() == Some(account_id)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Second click. Always disarms the gate; succeeds only if it was armed
    /// for this same account.
    pub fn confirm(&mut self, account_id: &str) -> Result<ConfirmedUnlink, IdentityError> {
        match self.pending.take() {
            Some(pending) if pending == account_id => Ok(ConfirmedUnlink {
                account_id: pending,
            }),
            _ => Err(IdentityError::ConfirmationRequired(account_id.to_string())),
        }
    }
}
