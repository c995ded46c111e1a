// src/notify/notifier.rs
use async_trait::async_trait;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification transport error: {0}")]
    Transport(String),

    #[error("Notification rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Delivers an alert to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError>;

    fn name(&self) -> &'static str;
}

/// Logs the alert instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        warn!(%subject, %body, "Alert not sent (dry run)");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
