// src/health/checker.rs
use super::status::StatusRecord;
use crate::config::Config;
use chrono::Utc;
use reqwest::Client;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};
use url::Url;

/// Issues the single GET that decides whether the target is up.
pub struct Prober {
    url: Url,
    timeout: Duration,
    client: Client,
}

impl Prober {
    pub fn new(url: Url, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url,
            timeout: request_timeout,
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(config.target_url.clone(), config.timeout())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Probe the target once. Transport failures are folded into the record.
    pub async fn probe(&self) -> StatusRecord {
        let start = Instant::now();

        debug!("Probing {} with timeout {:?}", self.url, self.timeout);

        let result = timeout(self.timeout, self.client.get(self.url.as_str()).send()).await;

        let latency_ms = start.elapsed().as_millis() as u64;
        let checked_at = Utc::now();

        let record = match result {
            Ok(Ok(response)) => StatusRecord::from_response(
                self.url.as_str(),
                response.status().as_u16(),
                latency_ms,
                checked_at,
            ),
            Ok(Err(e)) => {
                StatusRecord::transport_failure(self.url.as_str(), e.to_string(), latency_ms, checked_at)
            }
            Err(_) => StatusRecord::transport_failure(
                self.url.as_str(),
                format!("Request timeout after {}s", self.timeout.as_secs()),
                latency_ms,
                checked_at,
            ),
        };

        if record.ok {
            info!(
                "{} is healthy: status {:?} in {}ms",
                record.url, record.status_code, latency_ms
            );
        } else {
            warn!(
                "{} is unhealthy: status {:?}, error {:?}, {}ms",
                record.url, record.status_code, record.error, latency_ms
            );
        }

        record
    }
}
