//! Email address lifecycle: add, resend, verify, promote to primary.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{info, warn};

use crate::caller::Caller;
use crate::error::IdentityError;
use crate::provider::wire::WireEmailAddress;
use crate::provider::IdentityProvider;
use crate::types::{EmailAddressRecord, UserPatch, VerificationOutcome};

const VERIFIED_STATUS: &str = "verified";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Structural check: non-empty local part, `@`, dotted domain.
/// Returns the trimmed address.
pub fn validate_email_address(raw: &str) -> Result<&str, IdentityError> {
    let address = raw.trim();
    if email_pattern().is_match(address) {
        Ok(address)
    } else {
        Err(IdentityError::InvalidEmail(address.to_string()))
    }
}

pub struct EmailLifecycle {
    provider: Arc<dyn IdentityProvider>,
}

impl EmailLifecycle {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Create an address and kick off its email-code challenge.
    ///
    /// The challenge is best effort: if it fails the address still exists and
    /// the caller can [`resend`](Self::resend).
    pub async fn add(
        &self,
        caller: &Caller,
        address: &str,
    ) -> Result<EmailAddressRecord, IdentityError> {
        let user_id = caller.require_user()?;
        let address = validate_email_address(address)?;

        let created = self.provider.create_email_address(user_id, address).await?;
        info!(email_id = %created.id, "email address created");

        if let Err(error) = self.provider.prepare_email_verification(&created.id).await {
            warn!(
                email_id = %created.id,
                kind = %error.kind(),
                "verification challenge not sent, resend is available"
            );
        }

        Ok(EmailAddressRecord::unverified(created.id, created.email_address))
    }

    /// Re-send the email-code challenge.
    pub async fn resend(&self, caller: &Caller, email_id: &str) -> Result<(), IdentityError> {
        caller.require_user()?;
        self.provider.prepare_email_verification(email_id).await
    }

    /// Submit a verification code. Any status other than `verified` is a
    /// successful "not yet" answer.
    pub async fn attempt(
        &self,
        caller: &Caller,
        email_id: &str,
        code: &str,
    ) -> Result<VerificationOutcome, IdentityError> {
        caller.require_user()?;
        let code = code.trim();
        if code.is_empty() {
            return Err(IdentityError::EmptyCode);
        }

        let attempt = self
            .provider
            .attempt_email_verification(email_id, code)
            .await?;
        let verified = attempt.status() == Some(VERIFIED_STATUS);
        info!(email_id, verified, status = ?attempt.status(), "verification attempted");
        Ok(VerificationOutcome { verified })
    }

    /// Promote a verified address to primary.
    ///
    /// `emails` is the caller's current projection. The returned list has
    /// `primary` re-derived by id, and is only produced after the provider
    /// confirmed the change.
    pub async fn set_primary(
        &self,
        caller: &Caller,
        emails: &[EmailAddressRecord],
        email_id: &str,
    ) -> Result<Vec<EmailAddressRecord>, IdentityError> {
        let user_id = caller.require_user()?;
        let target = emails
            .iter()
            .find(|e| e.id == email_id)
            .ok_or_else(|| IdentityError::EmailNotFound(email_id.to_string()))?;
        if !target.verified {
            return Err(IdentityError::EmailNotVerified(email_id.to_string()));
        }

        let patch = UserPatch::PrimaryEmail {
            primary_email_address_id: email_id.to_string(),
        };
        self.provider.update_user(user_id, &patch).await?;
        info!(email_id, "primary email changed");

        Ok(apply_primary(emails, email_id))
    }
}

/// Mark exactly `primary_id` as primary and every sibling as not.
pub fn apply_primary(emails: &[EmailAddressRecord], primary_id: &str) -> Vec<EmailAddressRecord> {
    emails
        .iter()
        .map(|e| EmailAddressRecord {
            primary: e.id == primary_id,
            ..e.clone()
        })
        .collect()
}

/// Project a provider address; `primary` comes from the user's primary id.
pub fn project_email(wire: &WireEmailAddress, primary_id: Option<&str>) -> EmailAddressRecord {
    let verified = wire.is_verified();
    EmailAddressRecord {
        id: wire.id.clone(),
        email_address: wire.email_address.clone(),
        verified,
        primary: verified && primary_id == Some(wire.id.as_str()),
        pending_code: None,
    }
}
