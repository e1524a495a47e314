//! Shared test helpers and an in-memory identity provider.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use warden::accounts::LinkLauncher;
use warden::config::ProviderConfig;
use warden::error::IdentityError;
use warden::facade::IdentityFacade;
use warden::provider::wire::{
    WireEmailAddress, WireSession, WireUser, WireVerificationAttempt,
};
use warden::provider::IdentityProvider;
use warden::types::{AvatarUpload, UserPatch};
use warden::util::timeout::with_timeout;

pub const USER_ID: &str = "user_1";

/// In-memory provider that records every call in order and can be told to
/// fail specific operations.
pub struct RecordingProvider {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    sessions: Mutex<Vec<WireSession>>,
    details: Mutex<HashMap<String, WireSession>>,
    detail_delays: Mutex<HashMap<String, Duration>>,
    failing_details: Mutex<HashSet<String>>,
    detail_deadline: Mutex<Option<Duration>>,
    misconfigured: Mutex<bool>,
    user: Mutex<WireUser>,
    attempt_status: Mutex<String>,
    next_email: Mutex<u32>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            sessions: Mutex::new(Vec::new()),
            details: Mutex::new(HashMap::new()),
            detail_delays: Mutex::new(HashMap::new()),
            failing_details: Mutex::new(HashSet::new()),
            detail_deadline: Mutex::new(None),
            misconfigured: Mutex::new(false),
            user: Mutex::new(user_json(json!({}))),
            attempt_status: Mutex::new("verified".to_string()),
            next_email: Mutex::new(100),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Make every call to `operation` fail with a 500.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    pub fn seed_sessions(&self, ids: &[&str]) {
        let sessions = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                serde_json::from_value(json!({
                    "id": id,
                    "status": "active",
                    "last_active_at": 1_700_000_000_000_i64 + i as i64 * 1000,
                }))
                .unwrap()
            })
            .collect();
        *self.sessions.lock().unwrap() = sessions;
    }

    pub fn seed_detail(&self, id: &str, user_agent: &str) {
        let detail: WireSession = serde_json::from_value(json!({
            "id": id,
            "status": "active",
            "latest_activity": { "user_agent": user_agent }
        }))
        .unwrap();
        self.details.lock().unwrap().insert(id.to_string(), detail);
    }

    pub fn delay_detail(&self, id: &str, delay: Duration) {
        self.detail_delays
            .lock()
            .unwrap()
            .insert(id.to_string(), delay);
    }

    pub fn fail_detail(&self, id: &str) {
        self.failing_details.lock().unwrap().insert(id.to_string());
    }

    /// Bound each detail fetch the way the HTTP client bounds a request.
    pub fn set_detail_deadline(&self, deadline: Duration) {
        *self.detail_deadline.lock().unwrap() = Some(deadline);
    }

    /// Fail every call as if the provider secret were missing.
    pub fn misconfigure(&self) {
        *self.misconfigured.lock().unwrap() = true;
    }

    pub fn seed_user(&self, user: serde_json::Value) {
        *self.user.lock().unwrap() = user_json(user);
    }

    pub fn set_attempt_status(&self, status: &str) {
        *self.attempt_status.lock().unwrap() = status.to_string();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose operation name equals `operation`.
    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(':').next() == Some(operation))
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn user_snapshot(&self) -> WireUser {
        self.user.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, arg: &str) -> Result<(), IdentityError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation}:{arg}"));
        if *self.misconfigured.lock().unwrap() {
            return Err(IdentityError::MissingProviderSecret);
        }
        if self.failing.lock().unwrap().contains(operation) {
            return Err(IdentityError::upstream(500, format!("{operation} failed")));
        }
        Ok(())
    }

    async fn fetch_detail(&self, session_id: &str) -> Result<WireSession, IdentityError> {
        let delay = self.detail_delays.lock().unwrap().get(session_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_details.lock().unwrap().contains(session_id) {
            return Err(IdentityError::upstream(502, "detail unavailable"));
        }
        let detail = self.details.lock().unwrap().get(session_id).cloned();
        Ok(detail.unwrap_or_else(|| WireSession {
            id: session_id.to_string(),
            ..Default::default()
        }))
    }
}

fn user_json(overrides: serde_json::Value) -> WireUser {
    let mut base = json!({
        "id": USER_ID,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "primary_email_address_id": null,
        "email_addresses": [],
        "external_accounts": [],
        "image_url": "",
        "has_image": false
    });
    if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(base).unwrap()
}

#[async_trait]
impl IdentityProvider for RecordingProvider {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<WireSession>, IdentityError> {
        self.record("list_sessions", user_id)?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn get_session(&self, session_id: &str) -> Result<WireSession, IdentityError> {
        self.record("get_session", session_id)?;
        let deadline = *self.detail_deadline.lock().unwrap();
        match deadline {
            Some(deadline) => with_timeout(deadline, self.fetch_detail(session_id)).await,
            None => self.fetch_detail(session_id).await,
        }
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), IdentityError> {
        self.record("delete_session", session_id)?;
        self.sessions.lock().unwrap().retain(|s| s.id != session_id);
        Ok(())
    }

    async fn revoke_session(&self, session_id: &str) -> Result<(), IdentityError> {
        self.record("revoke_session", session_id)?;
        self.sessions.lock().unwrap().retain(|s| s.id != session_id);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<WireUser, IdentityError> {
        self.record("get_user", user_id)?;
        Ok(self.user.lock().unwrap().clone())
    }

    async fn create_email_address(
        &self,
        _user_id: &str,
        email_address: &str,
    ) -> Result<WireEmailAddress, IdentityError> {
        self.record("create_email_address", email_address)?;
        let id = {
            let mut next = self.next_email.lock().unwrap();
            *next += 1;
            format!("idn_{next}")
        };
        let created: WireEmailAddress = serde_json::from_value(json!({
            "id": id,
            "email_address": email_address,
            "verification": { "status": "unverified" }
        }))
        .unwrap();
        self.user
            .lock()
            .unwrap()
            .email_addresses
            .push(created.clone());
        Ok(created)
    }

    async fn prepare_email_verification(&self, email_id: &str) -> Result<(), IdentityError> {
        self.record("prepare_email_verification", email_id)
    }

    async fn attempt_email_verification(
        &self,
        email_id: &str,
        code: &str,
    ) -> Result<WireVerificationAttempt, IdentityError> {
        self.record("attempt_email_verification", &format!("{email_id}/{code}"))?;
        let status = self.attempt_status.lock().unwrap().clone();
        if status == "verified" {
            let mut user = self.user.lock().unwrap();
            if let Some(email) = user.email_addresses.iter_mut().find(|e| e.id == email_id) {
                email.verification = serde_json::from_value(json!({ "status": "verified" })).ok();
            }
        }
        Ok(serde_json::from_value(json!({ "status": status })).unwrap())
    }

    async fn update_user(
        &self,
        _user_id: &str,
        patch: &UserPatch,
    ) -> Result<WireUser, IdentityError> {
        let mut user = self.user.lock().unwrap().clone();
        match patch {
            UserPatch::PrimaryEmail {
                primary_email_address_id,
            } => {
                self.record("update_user", &format!("primary={primary_email_address_id}"))?;
                user.primary_email_address_id = Some(primary_email_address_id.clone());
            }
            UserPatch::Profile(profile) => {
                self.record("update_user", "profile")?;
                if let Some(first) = &profile.first_name {
                    user.first_name = Some(first.clone());
                }
                if let Some(last) = &profile.last_name {
                    user.last_name = Some(last.clone());
                }
            }
        }
        *self.user.lock().unwrap() = user.clone();
        Ok(user)
    }

    async fn delete_external_account(
        &self,
        _user_id: &str,
        account_id: &str,
    ) -> Result<(), IdentityError> {
        self.record("delete_external_account", account_id)?;
        self.user
            .lock()
            .unwrap()
            .external_accounts
            .retain(|a| a.id != account_id);
        Ok(())
    }

    async fn upload_profile_image(
        &self,
        _user_id: &str,
        upload: &AvatarUpload,
        content_type: &str,
    ) -> Result<WireUser, IdentityError> {
        self.record("upload_profile_image", content_type)?;
        let mut user = self.user.lock().unwrap();
        user.image_url = Some(format!("https://img.example.com/{}", upload.file_name));
        user.has_image = Some(true);
        Ok(user.clone())
    }

    async fn delete_profile_image(&self, user_id: &str) -> Result<(), IdentityError> {
        self.record("delete_profile_image", user_id)?;
        let mut user = self.user.lock().unwrap();
        user.image_url = None;
        user.has_image = Some(false);
        Ok(())
    }
}

/// Link launcher that only counts invocations.
#[derive(Default)]
pub struct CountingLauncher {
    pub started: Mutex<Vec<String>>,
}

#[async_trait]
impl LinkLauncher for CountingLauncher {
    async fn start_link(&self, provider_key: &str) -> Result<(), IdentityError> {
        self.started.lock().unwrap().push(provider_key.to_string());
        Ok(())
    }
}

pub fn test_config() -> ProviderConfig {
    ProviderConfig::new("sk_test_secret")
        .with_known_providers(["google", "github", "microsoft"])
        .with_link_refresh_delay(Duration::from_millis(1500))
}

pub fn facade(provider: &Arc<RecordingProvider>) -> IdentityFacade {
    IdentityFacade::with_provider(provider.clone(), &test_config())
}

pub fn png(name: &str, size: usize) -> AvatarUpload {
    AvatarUpload {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![0u8; size],
    }
}

pub fn verified_email(id: &str, address: &str) -> serde_json::Value {
    json!({ "id": id, "email_address": address, "verification": { "status": "verified" } })
}

pub fn unverified_email(id: &str, address: &str) -> serde_json::Value {
    json!({ "id": id, "email_address": address, "verification": { "status": "unverified" } })
}
