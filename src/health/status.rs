// src/health/status.rs
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the most recent probe. This is the whole persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub ok: bool,
    #[serde(rename = "status")]
    pub status_code: Option<u16>,
    pub latency_ms: Option<u64>,
    pub checked_at: DateTime<Utc>,
    pub url: String,
    pub error: Option<String>,
}

impl StatusRecord {
    /// A response was received; health follows the status code.
    pub fn from_response(
        url: impl Into<String>,
        status_code: u16,
        latency_ms: u64,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ok: is_healthy_status(status_code),
            status_code: Some(status_code),
            latency_ms: Some(latency_ms),
            checked_at: checked_at.trunc_subsecs(0),
            url: url.into(),
            error: None,
        }
    }

    /// The request failed before any response arrived.
    pub fn transport_failure(
        url: impl Into<String>,
        error: impl Into<String>,
        latency_ms: u64,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ok: false,
            status_code: None,
            latency_ms: Some(latency_ms),
            checked_at: checked_at.trunc_subsecs(0),
            url: url.into(),
            error: Some(error.into()),
        }
    }
}

/// Healthy means 2xx or 3xx.
pub fn is_healthy_status(status_code: u16) -> bool {
    (200..400).contains(&status_code)
}
