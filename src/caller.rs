//! Caller identity handed in by the authentication layer.

use crate::error::IdentityError;

/// Who is calling, as established upstream.
///
/// `session_id` is opaque: it is only compared against listed session ids to
/// flag the current one and is never derived here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    user_id: Option<String>,
    session_id: Option<String>,
}

impl Caller {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            session_id: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// First check of every operation.
    pub fn require_user(&self) -> Result<&str, IdentityError> {
        match self.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(IdentityError::Unauthenticated),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}
