//! Uniform `{ok, error, data}` envelope returned by every facade command.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, IdentityError};

/// Result envelope handed to the calling UI.
///
/// Nothing past the facade boundary sees an [`IdentityError`]; it is reduced
/// to its [`ErrorKind`] here so the caller can map it to a message.
///
/// # Example
/// ```
/// use warden::types::ActionResult;
/// use warden::error::ErrorKind;
///
/// let done: ActionResult<u32> = ActionResult::success(3);
/// assert!(done.ok);
///
/// let failed: ActionResult<u32> = ActionResult::failure(ErrorKind::EmptyCode);
/// assert_eq!(failed.error_str(), Some("empty_code"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(kind: ErrorKind) -> Self {
        Self {
            ok: false,
            error: Some(kind),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn error_str(&self) -> Option<&'static str> {
        self.error.map(ErrorKind::as_str)
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        ActionResult {
            ok: self.ok,
            error: self.error,
            data: self.data.map(f),
        }
    }

    /// Back into a `Result`, keeping only the kind on failure.
    pub fn into_result(self) -> Result<T, ErrorKind> {
        match (self.ok, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(kind)) => Err(kind),
            _ => Err(ErrorKind::InvalidResponse),
        }
    }
}

impl<T> From<Result<T, IdentityError>> for ActionResult<T> {
    fn from(result: Result<T, IdentityError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(err.kind()),
        }
    }
}
