//! Identity provider seam and its HTTP implementation.

pub mod client;
pub mod http;
pub mod wire;

pub use client::HttpIdentityProvider;

use async_trait::async_trait;

use crate::error::IdentityError;
use crate::types::{AvatarUpload, UserPatch};
use wire::{WireEmailAddress, WireSession, WireUser, WireVerificationAttempt};

/// Outbound surface of the external identity provider.
///
/// One method per consumed endpoint. Implementations return raw wire payloads
/// and typed failures; normalization happens in the components.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<WireSession>, IdentityError>;

    async fn get_session(&self, session_id: &str) -> Result<WireSession, IdentityError>;

    async fn delete_session(&self, session_id: &str) -> Result<(), IdentityError>;

    /// Fallback used when [`IdentityProvider::delete_session`] fails.
    async fn revoke_session(&self, session_id: &str) -> Result<(), IdentityError>;

    async fn get_user(&self, user_id: &str) -> Result<WireUser, IdentityError>;

    async fn create_email_address(
        &self,
        user_id: &str,
        email_address: &str,
    ) -> Result<WireEmailAddress, IdentityError>;

    async fn prepare_email_verification(&self, email_id: &str) -> Result<(), IdentityError>;

    async fn attempt_email_verification(
        &self,
        email_id: &str,
        code: &str,
    ) -> Result<WireVerificationAttempt, IdentityError>;

    async fn update_user(&self, user_id: &str, patch: &UserPatch)
        -> Result<WireUser, IdentityError>;

    async fn delete_external_account(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<(), IdentityError>;

    async fn upload_profile_image(
        &self,
        user_id: &str,
        upload: &AvatarUpload,
        content_type: &str,
    ) -> Result<WireUser, IdentityError>;

    async fn delete_profile_image(&self, user_id: &str) -> Result<(), IdentityError>;
}
