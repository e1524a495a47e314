//! Session registry: list, enrich, and revoke the caller's sessions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::caller::Caller;
use crate::device;
use crate::error::{ErrorCategory, IdentityError};
use crate::provider::wire::WireSession;
use crate::provider::IdentityProvider;
use crate::types::{SessionRecord, SessionStatus};

/// Upper bound on detail fetches issued per listing.
pub const ENRICHMENT_LIMIT: usize = 15;

/// Epoch values above this are milliseconds, otherwise seconds.
const MILLIS_THRESHOLD: f64 = 1e12;

/// Lists and revokes sessions belonging to the caller.
pub struct SessionRegistry {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionRegistry {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Fetch, normalize, flag the current session, then enrich.
    pub async fn list(&self, caller: &Caller) -> Result<Vec<SessionRecord>, IdentityError> {
        let user_id = caller.require_user()?;
        let raw = self.provider.list_sessions(user_id).await?;
        let mut sessions: Vec<SessionRecord> = raw.iter().map(project_session).collect();
        mark_current(&mut sessions, caller.session_id());
        Ok(self.enrich(sessions).await)
    }

    /// Attach device metadata to the first [`ENRICHMENT_LIMIT`] sessions.
    ///
    /// Detail fetches run concurrently and settle independently: a failed
    /// fetch leaves its session un-enriched. Output order and length always
    /// match the input.
    pub async fn enrich(&self, mut sessions: Vec<SessionRecord>) -> Vec<SessionRecord> {
        let fetches = sessions.iter().take(ENRICHMENT_LIMIT).map(|session| {
            let provider = Arc::clone(&self.provider);
            let id = session.id.clone();
            async move { provider.get_session(&id).await }
        });
        let settled = future::join_all(fetches).await;

        let mut enriched = 0usize;
        // Merged by position, so repeated ids each keep their own outcome.
        for (session, outcome) in sessions.iter_mut().zip(settled) {
            match outcome {
                Ok(wire) => {
                    DeviceDetails::from_wire(&wire).apply(session);
                    enriched += 1;
                }
                Err(error) => {
                    warn!(session_id = %session.id, kind = %error.kind(), "session detail fetch failed");
                }
            }
        }
        debug!(enriched, total = sessions.len(), "session enrichment settled");

        sessions
    }

    /// Revoke a session: delete first, revoke as the one fallback.
    /// Configuration failures skip the fallback.
    pub async fn revoke(&self, caller: &Caller, session_id: &str) -> Result<(), IdentityError> {
        caller.require_user()?;

        match self.provider.delete_session(session_id).await {
            Ok(()) => {
                info!(session_id, "session deleted");
                Ok(())
            }
            Err(delete_error) if delete_error.category() == ErrorCategory::Configuration => {
                Err(delete_error)
            }
            Err(delete_error) => {
                warn!(
                    session_id,
                    kind = %delete_error.kind(),
                    "session delete failed, falling back to revoke"
                );
                self.provider.revoke_session(session_id).await?;
                info!(session_id, "session revoked");
                Ok(())
            }
        }
    }
}

#[derive(Debug, Default)]
struct DeviceDetails {
    device: Option<String>,
    user_agent: Option<String>,
}

impl DeviceDetails {
    fn from_wire(wire: &WireSession) -> Self {
        let Some(activity) = wire.latest_activity.as_ref() else {
            return Self::default();
        };
        let user_agent = activity
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(str::to_string);
        let device = activity
            .device_type
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .or_else(|| user_agent.as_deref().map(|ua| device::classify(ua).label));
        Self { device, user_agent }
    }

    fn apply(self, session: &mut SessionRecord) {
        if self.device.is_some() {
            session.device = self.device;
        }
        if self.user_agent.is_some() {
            session.user_agent = self.user_agent;
        }
    }
}

/// Project a listed session into a base (un-enriched) record.
pub fn project_session(wire: &WireSession) -> SessionRecord {
    SessionRecord {
        id: wire.id.clone(),
        latest_activity_at: wire.last_active_at.as_ref().and_then(normalize_timestamp),
        status: wire
            .status
            .as_deref()
            .map(SessionStatus::parse)
            .unwrap_or_default(),
        current: false,
        device: None,
        user_agent: None,
    }
}

/// Flag at most one record whose id equals the caller's session id.
pub fn mark_current(sessions: &mut [SessionRecord], my_session_id: Option<&str>) {
    let mut found = false;
    for session in sessions.iter_mut() {
        session.current = !found && my_session_id == Some(session.id.as_str());
        found |= session.current;
    }
}

/// Turn a provider timestamp into an instant.
///
/// Numbers (or numeric strings) above 10^12 are epoch milliseconds, smaller
/// ones epoch seconds. Other strings are tried as RFC 3339.
pub fn normalize_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<f64>() {
                Ok(n) => from_epoch(n),
                Err(_) => DateTime::parse_from_rfc3339(trimmed)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            }
        }
        _ => None,
    }
}

fn from_epoch(raw: f64) -> Option<DateTime<Utc>> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    let millis = if raw > MILLIS_THRESHOLD {
        raw
    } else {
        raw * 1000.0
    };
    DateTime::from_timestamp_millis(millis as i64)
}
