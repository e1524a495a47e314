//! Shared HTTP helpers: auth headers, status mapping, body previews.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;

use crate::error::IdentityError;

/// Maximum number of body bytes kept on an upstream failure.
pub const PREVIEW_LIMIT: usize = 256;

/// Build default headers for the bearer-token provider API.
///
/// Content type is left to the payload: JSON bodies set it through
/// `RequestBuilder::json`, multipart uploads set their own boundary.
pub fn bearer_headers(secret: &str) -> Result<HeaderMap, IdentityError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let value = HeaderValue::from_str(&format!("Bearer {secret}")).map_err(|_| {
        IdentityError::Configuration("provider secret is not a valid header value".to_string())
    })?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// First [`PREVIEW_LIMIT`] bytes of a body, cut on a char boundary.
pub fn body_preview(body: &str) -> String {
    if body.len() <= PREVIEW_LIMIT {
        return body.to_string();
    }
    let mut end = PREVIEW_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

/// Map a non-2xx response into an upstream error.
pub fn status_to_error(status: u16, body: &str) -> IdentityError {
    IdentityError::upstream(status, body_preview(body))
}

/// Decode a 2xx body. Failures keep a preview of what was received.
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, IdentityError> {
    serde_json::from_str(body).map_err(|e| {
        IdentityError::InvalidResponse(format!("{e} (body: {})", body_preview(body)))
    })
}
