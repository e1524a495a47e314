//! Convenience re-exports for common use.

pub use crate::accounts::{ConfirmedUnlink, LinkLauncher, UnlinkGate};
pub use crate::caller::Caller;
pub use crate::config::ProviderConfig;
pub use crate::error::{ErrorKind, IdentityError, Result};
pub use crate::facade::IdentityFacade;
pub use crate::provider::{HttpIdentityProvider, IdentityProvider};
pub use crate::types::{
    AccountSnapshot, ActionResult, AvatarImage, AvatarUpload, EmailAddressRecord,
    ExternalAccountRecord, ProfilePatch, SessionRecord, SessionStatus, VerificationOutcome,
};
pub use crate::view::AccountView;
