// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STATE_PATH: &str = "docs/status.json";

/// Everything one check run needs. Built once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub target_url: Url,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    // Notification routing
    pub aws_region: String,
    pub from_email: String,
    pub to_email: String,
    /// Overrides the regional SES endpoint, e.g. for a local emulator.
    #[serde(default)]
    pub ses_endpoint: Option<String>,

    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Step-output file exported by GitHub Actions.
    #[serde(default)]
    pub github_output: Option<PathBuf>,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_state_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_PATH)
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Explicit SES endpoint, if any. `None` lets the SDK resolve the regional one.
    pub fn ses_endpoint(&self) -> Option<&str> {
        self.ses_endpoint
            .as_deref()
            .map(|endpoint| endpoint.trim_end_matches('/'))
    }

    /// CI runners export unset variables as empty strings.
    pub fn normalize(mut self) -> Self {
        if self
            .ses_endpoint
            .as_deref()
            .map_or(false, |v| v.trim().is_empty())
        {
            self.ses_endpoint = None;
        }
        if self
            .github_output
            .as_ref()
            .map_or(false, |p| p.as_os_str().is_empty())
        {
            self.github_output = None;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        match self.target_url.scheme() {
            "http" | "https" => {}
            other => bail!("target_url must use http or https, got '{}'", other),
        }

        if self.timeout_seconds == 0 {
            bail!("timeout_seconds must be greater than zero");
        }

        if self.aws_region.trim().is_empty() {
            bail!("aws_region must not be empty");
        }

        if self.from_email.trim().is_empty() {
            bail!("from_email must not be empty");
        }

        if self.to_email.trim().is_empty() {
            bail!("to_email must not be empty");
        }

        if self.state_path.as_os_str().is_empty() {
            bail!("state_path must not be empty");
        }

        Ok(())
    }
}

/// Values given on the command line; they take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub state_path: Option<PathBuf>,
}
