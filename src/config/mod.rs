// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from defaults, an optional file (YAML or JSON), the
/// process environment and command-line overrides, in increasing precedence.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    let mut builder = ::config::Config::builder()
        .set_default("timeout_seconds", DEFAULT_TIMEOUT_SECS as i64)?
        .set_default("state_path", DEFAULT_STATE_PATH)?;

    if let Some(path) = path {
        builder = builder.add_source(::config::File::from(path).required(true));
    }

    builder = builder
        .add_source(::config::Environment::default())
        .set_override_option("target_url", overrides.target_url.clone())?
        .set_override_option("timeout_seconds", overrides.timeout_seconds.map(|t| t as i64))?
        .set_override_option(
            "state_path",
            overrides
                .state_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        )?;

    let config: Config = builder
        .build()
        .context("Failed to assemble configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    let config = config.normalize();
    config.validate()?;
    Ok(config)
}
