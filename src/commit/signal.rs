// src/commit/signal.rs
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub const OUTPUT_KEY: &str = "should_commit";

#[derive(Debug, thiserror::Error)]
#[error("Failed to write commit signal to {}: {source}", .path.display())]
pub struct SignalError {
    path: PathBuf,
    source: std::io::Error,
}

/// `should_commit=true|false`, the line both stdout and the step-output file get.
pub fn signal_line(should_commit: bool) -> String {
    format!("{}={}", OUTPUT_KEY, should_commit)
}

/// Receives the commit decision as soon as it is made.
#[async_trait]
pub trait CommitSink: Send + Sync {
    async fn emit(&self, should_commit: bool) -> Result<(), SignalError>;
}

/// Prints the flag on stdout and, when configured, appends it to the
/// GitHub Actions step-output file.
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    github_output: Option<PathBuf>,
}

impl StepOutput {
    pub fn new(github_output: Option<PathBuf>) -> Self {
        Self { github_output }
    }
}

#[async_trait]
impl CommitSink for StepOutput {
    async fn emit(&self, should_commit: bool) -> Result<(), SignalError> {
        println!("{}", signal_line(should_commit));
        if let Some(path) = &self.github_output {
            write_github_output(path, should_commit).await?;
        }
        Ok(())
    }
}

/// Append the flag to a GitHub Actions step-output file.
pub async fn write_github_output(path: &Path, should_commit: bool) -> Result<(), SignalError> {
    let to_err = |source| SignalError {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(to_err)?;

    let mut line = signal_line(should_commit);
    line.push('\n');
    file.write_all(line.as_bytes()).await.map_err(to_err)?;
    file.flush().await.map_err(to_err)?;

    debug!("Recorded {} in {}", line.trim_end(), path.display());
    Ok(())
}
