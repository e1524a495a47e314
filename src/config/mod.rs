//! Provider configuration (layered: code > env > config file, see
//! [`ProviderConfig::load`]).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::IdentityError;

pub const DEFAULT_BASE_URL: &str = "https://api.clerk.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_LINK_REFRESH_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_KNOWN_PROVIDERS: [&str; 4] = ["google", "github", "microsoft", "apple"];

const SECRET_ENV: &str = "WARDEN_PROVIDER_SECRET";
const BASE_URL_ENV: &str = "WARDEN_PROVIDER_BASE_URL";
const TIMEOUT_ENV: &str = "WARDEN_REQUEST_TIMEOUT_MS";
const KNOWN_PROVIDERS_ENV: &str = "WARDEN_KNOWN_PROVIDERS";

/// Configuration injected into the provider client at construction.
///
/// The secret is optional here on purpose: a facade can be built without it,
/// and every call then fails fast with
/// [`IdentityError::MissingProviderSecret`] before touching the network.
#[derive(Clone)]
pub struct ProviderConfig {
    secret_key: Option<String>,
    base_url: String,
    request_timeout: Duration,
    known_providers: Vec<String>,
    link_refresh_delay: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("known_providers", &self.known_providers)
            .field("link_refresh_delay", &self.link_refresh_delay)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            known_providers: DEFAULT_KNOWN_PROVIDERS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            link_refresh_delay: DEFAULT_LINK_REFRESH_DELAY,
        }
    }
}

impl ProviderConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self::default().with_secret_key(secret_key)
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Full layered load: `~/.warden/config.toml`, then environment
    /// variables on top. Builder setters applied afterwards win over both.
    pub fn load() -> Result<Self, IdentityError> {
        Self::load_layered(Self::default_config_path())
    }

    /// Like [`load`](Self::load) with an explicit config file path.
    pub fn load_layered(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        Ok(Self::load_from_path(path)?.overlay_env())
    }

    fn overlay_env(mut self) -> Self {
        let _ = dotenvy::dotenv();

        if let Ok(secret) = std::env::var(SECRET_ENV) {
            self.secret_key = Some(secret);
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.request_timeout = Duration::from_millis(ms),
                _ => warn!(
                    value = %raw,
                    kept_ms = self.request_timeout.as_millis() as u64,
                    "ignoring invalid WARDEN_REQUEST_TIMEOUT_MS, must be a positive integer"
                ),
            }
        }
        if let Ok(raw) = std::env::var(KNOWN_PROVIDERS_ENV) {
            let providers = split_provider_list(&raw);
            if !providers.is_empty() {
                self.known_providers = providers;
            }
        }

        self
    }

    /// Parse a TOML config document. Unset keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, IdentityError> {
        let file: ConfigFile = toml::from_str(raw)?;
        let mut config = Self::default();
        if file.secret_key.is_some() {
            config.secret_key = file.secret_key;
        }
        if let Some(url) = file.base_url {
            config.base_url = url;
        }
        if let Some(ms) = file.request_timeout_ms {
            if ms == 0 {
                return Err(IdentityError::Configuration(
                    "request_timeout_ms must be greater than zero".to_string(),
                ));
            }
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(providers) = file.known_providers {
            config.known_providers = providers;
        }
        if let Some(ms) = file.link_refresh_delay_ms {
            config.link_refresh_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let raw = match fs::read_to_string(path.as_ref()) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(IdentityError::Io(err)),
        };
        Self::from_toml_str(&raw)
    }

    /// Default config file location (`~/.warden/config.toml`).
    pub fn default_config_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".warden"))
            .unwrap_or_else(|| PathBuf::from(".warden"))
            .join("config.toml")
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn without_secret_key(mut self) -> Self {
        self.secret_key = None;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_known_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_providers = providers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_link_refresh_delay(mut self, delay: Duration) -> Self {
        self.link_refresh_delay = delay;
        self
    }

    /// Resolve the secret or fail with the dedicated configuration error.
    pub fn require_secret(&self) -> Result<&str, IdentityError> {
        match self.secret_key.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(IdentityError::MissingProviderSecret),
        }
    }

    pub fn has_secret(&self) -> bool {
        self.require_secret().is_ok()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn known_providers(&self) -> &[String] {
        &self.known_providers
    }

    pub fn link_refresh_delay(&self) -> Duration {
        self.link_refresh_delay
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    secret_key: Option<String>,
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    known_providers: Option<Vec<String>>,
    link_refresh_delay_ms: Option<u64>,
}

fn split_provider_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
