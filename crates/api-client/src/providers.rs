//! Chat-completion clients for the AI providers the assistant can route to.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use jarvis_core::intelligence::Provider;

use crate::error::{ClientError, parse_response};

const MAX_TOKENS: u32 = 1024;
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub fn default_base_url(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "https://api.openai.com/v1",
        Provider::Anthropic => "https://api.anthropic.com/v1",
        Provider::Perplexity => "https://api.perplexity.ai",
    }
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI and Perplexity share the chat-completions shape.
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// One configured provider.
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    provider: Provider,
    api_key: String,
    model: String,
    base_url: String,
}

impl ChatClient {
    pub fn new(
        provider: Provider,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            provider,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: default_base_url(provider).to_string(),
        })
    }

    /// Point the client at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user turn and return the reply text.
    pub async fn complete(&self, system: &str, message: &str) -> Result<String, ClientError> {
        tracing::debug!(
            provider = %self.provider,
            model = %self.model,
            prompt_length = message.len(),
            "calling AI provider"
        );
        let reply = match self.provider {
            Provider::OpenAi | Provider::Perplexity => self.chat_completions(system, message).await,
            Provider::Anthropic => self.anthropic_messages(system, message).await,
        }?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ClientError::Decode(format!(
                "empty reply from {}",
                self.provider
            )));
        }
        Ok(reply.to_string())
    }

    async fn chat_completions(&self, system: &str, message: &str) -> Result<String, ClientError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
        };
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed: CompletionResponse = parse_response(resp).await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn anthropic_messages(&self, system: &str, message: &str) -> Result<String, ClientError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: [Message {
                role: "user",
                content: message,
            }],
        };
        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        let parsed: AnthropicResponse = parse_response(resp).await?;
        Ok(parsed
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .map(|b| b.text)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
