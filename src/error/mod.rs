//! Error types for Warden.

pub mod unified;

pub use unified::{ErrorCategory, ErrorKind};

use thiserror::Error;

/// Primary error type for all facade operations.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Identity provider secret is not configured")]
    MissingProviderSecret,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Verification code is empty")]
    EmptyCode,

    #[error("Invalid profile update: {0}")]
    InvalidProfile(String),

    #[error("File is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Email address not found: {0}")]
    EmailNotFound(String),

    #[error("Email address is not verified: {0}")]
    EmailNotVerified(String),

    #[error("Unlinking {0} requires confirmation")]
    ConfirmationRequired(String),

    #[error("Account linking is not available: {0}")]
    LinkUnsupported(String),

    #[error("Unknown external provider: {0}")]
    UnknownProvider(String),

    /// Non-2xx provider response. `preview` holds a bounded slice of the body
    /// for logs and is deliberately left out of the display string.
    #[error("Identity provider returned status {status}")]
    Upstream { status: u16, preview: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IdentityError {
    /// Create an upstream error from a status and an already bounded preview.
    pub fn upstream(status: u16, preview: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            preview: preview.into(),
        }
    }

    /// Machine-readable kind for the action result envelope.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingProviderSecret => ErrorKind::MissingProviderSecret,
            Self::Configuration(_) | Self::Io(_) => ErrorKind::InvalidConfiguration,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::InvalidEmail(_) => ErrorKind::InvalidEmail,
            Self::EmptyCode => ErrorKind::EmptyCode,
            Self::InvalidProfile(_) => ErrorKind::InvalidProfile,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Self::EmailNotFound(_) => ErrorKind::EmailNotFound,
            Self::EmailNotVerified(_) => ErrorKind::EmailNotVerified,
            Self::ConfirmationRequired(_) => ErrorKind::ConfirmationRequired,
            Self::LinkUnsupported(_) => ErrorKind::LinkUnsupported,
            Self::UnknownProvider(_) => ErrorKind::UnknownProvider,
            Self::Upstream { .. } => ErrorKind::UpstreamError,
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorKind::InvalidResponse,
        }
    }

    /// Classify this error into one of the four handling classes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingProviderSecret
            | Self::Configuration(_)
            | Self::Io(_)
            | Self::LinkUnsupported(_) => ErrorCategory::Configuration,
            Self::Unauthenticated => ErrorCategory::Unauthenticated,
            Self::InvalidEmail(_)
            | Self::EmptyCode
            | Self::InvalidProfile(_)
            | Self::FileTooLarge { .. }
            | Self::UnsupportedType(_)
            | Self::EmailNotFound(_)
            | Self::EmailNotVerified(_)
            | Self::ConfirmationRequired(_)
            | Self::UnknownProvider(_) => ErrorCategory::Validation,
            Self::Upstream { .. }
            | Self::Network(_)
            | Self::Timeout(_)
            | Self::InvalidResponse(_)
            | Self::Serialization(_) => ErrorCategory::Upstream,
        }
    }

    /// Whether the user can fix this by changing their input.
    pub fn is_user_correctable(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Bounded raw-body preview for upstream failures.
    pub fn preview(&self) -> Option<&str> {
        match self {
            Self::Upstream { preview, .. } => Some(preview.as_str()),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for IdentityError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, IdentityError>;
