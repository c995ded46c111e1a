// src/notify/ses.rs
use super::notifier::{Notifier, NotifyError};
use crate::config::Config;
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sesv2::error::{DisplayErrorContext, SdkError};
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client;
use std::time::Duration;
use tracing::{debug, info};

const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);
const CHARSET: &str = "UTF-8";

/// Sends alerts through Amazon SES v2. Credentials come from the SDK's
/// default provider chain (environment, shared profile, web identity, instance role).
pub struct SesNotifier {
    client: Client,
    from: String,
    to: String,
}

impl SesNotifier {
    pub fn new(client: Client, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            client,
            from: from.into(),
            to: to.into(),
        }
    }

    pub async fn from_config(config: &Config) -> Self {
        // A single attempt: alerts are never retried.
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(OPERATION_TIMEOUT)
                    .build(),
            );
        if let Some(endpoint) = config.ses_endpoint() {
            loader = loader.endpoint_url(endpoint);
        }

        let shared = loader.load().await;
        Self::new(Client::new(&shared), &config.from_email, &config.to_email)
    }

    fn content(subject: &str, body: &str) -> Result<EmailContent, NotifyError> {
        let text = |data: &str| {
            Content::builder()
                .data(data)
                .charset(CHARSET)
                .build()
                .map_err(|e| NotifyError::Transport(e.to_string()))
        };

        let message = Message::builder()
            .subject(text(subject)?)
            .body(Body::builder().html(text(body)?).build())
            .build();

        Ok(EmailContent::builder().simple(message).build())
    }
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let content = Self::content(subject, body)?;

        debug!("Sending alert from {} to {}", self.from, self.to);

        let output = self
            .client
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(&self.to).build())
            .content(content)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(ctx) => NotifyError::Rejected {
                    status: ctx.raw().status().as_u16(),
                    message: DisplayErrorContext(ctx.err()).to_string(),
                },
                _ => NotifyError::Transport(DisplayErrorContext(&e).to_string()),
            })?;

        info!(
            "Alert email sent to {} (message id {})",
            self.to,
            output.message_id().unwrap_or("unknown")
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ses"
    }
}
