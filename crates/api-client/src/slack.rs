use std::time::Duration;

use crate::error::ClientError;
use crate::retry::{RetryConfig, retry_post};

/// Posts messages to a Slack incoming webhook.
#[derive(Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
    retry: RetryConfig,
}

impl SlackNotifier {
    pub fn new(webhook_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            webhook_url: webhook_url.to_string(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn notify(&self, text: &str, channel: Option<&str>) -> Result<(), ClientError> {
        let mut body = serde_json::json!({ "text": text });
        if let Some(channel) = channel {
            body["channel"] = serde_json::Value::String(channel.to_string());
        }
        retry_post(&self.client, &self.webhook_url, &body, &self.retry).await?;
        Ok(())
    }
}
