//! Machine-readable error kinds and broad categories.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Short, stable error kind carried by every failed action result.
///
/// Callers map these to user-facing messages; the string form never changes
/// once published.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    MissingProviderSecret,
    InvalidConfiguration,
    Unauthenticated,
    InvalidEmail,
    EmptyCode,
    InvalidProfile,
    FileTooLarge,
    UnsupportedType,
    EmailNotFound,
    EmailNotVerified,
    ConfirmationRequired,
    LinkUnsupported,
    UnknownProvider,
    UpstreamError,
    NetworkError,
    Timeout,
    InvalidResponse,
}

impl ErrorKind {
    /// The wire string, e.g. `"missing_provider_secret"`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Broad error class used to route handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or broken configuration. Fatal for the facade, never retried.
    Configuration,
    /// Rejected locally before any network call; user-correctable.
    Validation,
    /// No caller identity.
    Unauthenticated,
    /// Non-2xx, transport failure, timeout, or undecodable body.
    Upstream,
}
