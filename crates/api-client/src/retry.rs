use std::time::Duration;

use tracing::warn;

use crate::error::{ClientError, check_status};

/// Configuration for retry behaviour on webhook-style POST requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: usize,
    /// Delay before each retry.
    pub delays: Vec<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delays: [1, 2, 4].map(Duration::from_secs).to_vec(),
        }
    }
}

impl RetryConfig {
    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delays: Vec::new(),
        }
    }
}

/// POST `body` as JSON, retrying with backoff on transport errors, 429 and 5xx.
///
/// Other 4xx responses are returned as errors immediately.
pub async fn retry_post(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
    config: &RetryConfig,
) -> Result<reqwest::Response, ClientError> {
    let max_attempts = config.max_retries + 1;
    let mut attempt = 0;
    loop {
        let result = match client.post(url).json(body).send().await {
            Ok(resp) => check_status(resp).await,
            Err(e) => Err(ClientError::from(e)),
        };
        let err = match result {
            Ok(resp) => return Ok(resp),
            Err(e) => e,
        };
        let delay = config.delays.get(attempt).copied();
        attempt += 1;
        match delay {
            Some(delay) if attempt < max_attempts && err.is_retryable() => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %err,
                    "POST failed, retrying in {}s",
                    delay.as_secs_f32(),
                );
                tokio::time::sleep(delay).await;
            }
            _ => return Err(err),
        }
    }
}
