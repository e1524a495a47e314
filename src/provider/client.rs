//! reqwest-backed [`IdentityProvider`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use super::http::{bearer_headers, body_preview, decode_json, status_to_error};
use super::wire::{WireEmailAddress, WireList, WireSession, WireUser, WireVerificationAttempt};
use super::IdentityProvider;
use crate::config::ProviderConfig;
use crate::error::IdentityError;
use crate::types::{AvatarUpload, UserPatch};
use crate::util::timeout::with_timeout;

enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart { boundary: String, body: Vec<u8> },
}

/// HTTP client for the identity provider's REST API.
///
/// Every call checks the secret first and fails with
/// [`IdentityError::MissingProviderSecret`] without building a request.
///
/// # Example
/// ```no_run
/// use warden::config::ProviderConfig;
/// use warden::provider::{HttpIdentityProvider, IdentityProvider};
///
/// # async fn example() -> warden::error::Result<()> {
/// let provider = HttpIdentityProvider::new(ProviderConfig::from_env())?;
/// let sessions = provider.list_sessions("user_123").await?;
/// println!("{} sessions", sessions.len());
/// # Ok(())
/// # }
/// ```
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpIdentityProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout())
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                IdentityError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client, config })
    }

    pub fn with_client(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Payload,
    ) -> Result<String, IdentityError> {
        let secret = self.config.require_secret()?;
        let mut headers = bearer_headers(secret)?;
        let url = format!("{}{}", self.config.base_url(), path);

        debug!(method = %method, path, "identity provider request");

        let mut request = self.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match payload {
            Payload::Empty => request.headers(headers),
            Payload::Json(body) => request.headers(headers).json(&body),
            Payload::Multipart { boundary, body } => {
                let content_type =
                    HeaderValue::from_str(&format!("multipart/form-data; boundary={boundary}"))
                        .map_err(|e| {
                            IdentityError::Configuration(format!(
                                "failed to build multipart content-type: {e}"
                            ))
                        })?;
                headers.insert(CONTENT_TYPE, content_type);
                request.headers(headers).body(body)
            }
        };

        let timeout = self.config.request_timeout();
        with_timeout(timeout, async move {
            let response = request
                .send()
                .await
                .map_err(|e| transport_error(e, timeout))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| transport_error(e, timeout))?;
            if !status.is_success() {
                warn!(
                    status = status.as_u16(),
                    path,
                    preview = %body_preview(&body),
                    "identity provider returned an error"
                );
                return Err(status_to_error(status.as_u16(), &body));
            }
            Ok(body)
        })
        .await
    }
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> IdentityError {
    if error.is_timeout() {
        IdentityError::Timeout(timeout.as_millis() as u64)
    } else {
        IdentityError::Network(error)
    }
}

fn build_image_multipart(boundary: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let file_name = file_name.replace(['"', '\r', '\n'], "_");
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<WireSession>, IdentityError> {
        let body = self
            .execute(
                Method::GET,
                "/sessions",
                &[("user_id", user_id), ("status", "active")],
                Payload::Empty,
            )
            .await?;
        Ok(decode_json::<WireList<WireSession>>(&body)?.into_vec())
    }

    async fn get_session(&self, session_id: &str) -> Result<WireSession, IdentityError> {
        let body = self
            .execute(
                Method::GET,
                &format!("/sessions/{session_id}"),
                &[],
                Payload::Empty,
            )
            .await?;
        decode_json(&body)
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), IdentityError> {
        self.execute(
            Method::DELETE,
            &format!("/sessions/{session_id}"),
            &[],
            Payload::Empty,
        )
        .await?;
        Ok(())
    }

    async fn revoke_session(&self, session_id: &str) -> Result<(), IdentityError> {
        self.execute(
            Method::POST,
            &format!("/sessions/{session_id}/revoke"),
            &[],
            Payload::Empty,
        )
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<WireUser, IdentityError> {
        let body = self
            .execute(Method::GET, &format!("/users/{user_id}"), &[], Payload::Empty)
            .await?;
        decode_json(&body)
    }

    async fn create_email_address(
        &self,
        user_id: &str,
        email_address: &str,
    ) -> Result<WireEmailAddress, IdentityError> {
        let body = self
            .execute(
                Method::POST,
                "/email_addresses",
                &[],
                Payload::Json(json!({
                    "user_id": user_id,
                    "email_address": email_address,
                    "verified": false,
                    "primary": false,
                })),
            )
            .await?;
        decode_json(&body)
    }

    async fn prepare_email_verification(&self, email_id: &str) -> Result<(), IdentityError> {
        self.execute(
            Method::POST,
            &format!("/email_addresses/{email_id}/prepare_verification"),
            &[],
            Payload::Json(json!({ "strategy": "email_code" })),
        )
        .await?;
        Ok(())
    }

    async fn attempt_email_verification(
        &self,
        email_id: &str,
        code: &str,
    ) -> Result<WireVerificationAttempt, IdentityError> {
        let body = self
            .execute(
                Method::POST,
                &format!("/email_addresses/{email_id}/attempt_verification"),
                &[],
                Payload::Json(json!({ "code": code })),
            )
            .await?;
        decode_json(&body)
    }

    async fn update_user(
        &self,
        user_id: &str,
        patch: &UserPatch,
    ) -> Result<WireUser, IdentityError> {
        let body = self
            .execute(
                Method::PATCH,
                &format!("/users/{user_id}"),
                &[],
                Payload::Json(serde_json::to_value(patch)?),
            )
            .await?;
        decode_json(&body)
    }

    async fn delete_external_account(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<(), IdentityError> {
        self.execute(
            Method::DELETE,
            &format!("/users/{user_id}/external_accounts/{account_id}"),
            &[],
            Payload::Empty,
        )
        .await?;
        Ok(())
    }

    async fn upload_profile_image(
        &self,
        user_id: &str,
        upload: &AvatarUpload,
        content_type: &str,
    ) -> Result<WireUser, IdentityError> {
        let boundary = format!("warden-{}", Uuid::new_v4().simple());
        let multipart =
            build_image_multipart(&boundary, &upload.file_name, content_type, &upload.bytes);
        let body = self
            .execute(
                Method::POST,
                &format!("/users/{user_id}/profile_image"),
                &[],
                Payload::Multipart {
                    boundary,
                    body: multipart,
                },
            )
            .await?;
        decode_json(&body)
    }

    async fn delete_profile_image(&self, user_id: &str) -> Result<(), IdentityError> {
        self.execute(
            Method::DELETE,
            &format!("/users/{user_id}/profile_image"),
            &[],
            Payload::Empty,
        )
        .await?;
        Ok(())
    }
}
