//! Routes a user message through the configured AI providers, falling back
//! to a canned reply. Every attempt is returned as an [`AiInteraction`] for
//! the intelligence log.

use chrono::Utc;
use std::time::Instant;

use jarvis_api_client::ChatClient;
use jarvis_core::assistant::{Intent, canned_reply, detect_intent, system_prompt};
use jarvis_core::intelligence::{AiInteraction, route};

use crate::AppState;

pub const FALLBACK_PROVIDER: &str = "fallback";

pub struct Answer {
    pub intent: Intent,
    pub reply: String,
    /// Provider that produced `reply`, or [`FALLBACK_PROVIDER`].
    pub provider: String,
    /// One entry per attempt, in call order.
    pub attempts: Vec<AiInteraction>,
}

/// Send `prompt` to a single provider and record the outcome.
pub async fn call_provider(client: &ChatClient, intent: Intent, prompt: &str) -> AiInteraction {
    let started = Instant::now();
    let result = client.complete(system_prompt(), prompt).await;
    let latency_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
    if let Err(e) = &result {
        tracing::warn!(
            provider = %client.provider(),
            status = ?e.status(),
            latency_ms,
            "AI provider call failed: {e}"
        );
    }
    let (response, error) = match result {
        Ok(reply) => (Some(reply), None),
        Err(e) => (None, Some(e.to_string())),
    };
    AiInteraction {
        id: uuid::Uuid::new_v4().to_string(),
        provider: client.provider().to_string(),
        model: client.model().to_string(),
        intent,
        prompt: prompt.to_string(),
        success: response.is_some(),
        response,
        latency_ms,
        error,
        created_at: Utc::now(),
    }
}

pub async fn answer(state: &AppState, message: &str) -> Answer {
    let intent = detect_intent(message);
    let order = {
        let mappings = state.mappings.read().await;
        route(
            intent,
            &mappings,
            state.config.default_provider,
            &state.services.configured_providers(),
        )
    };

    let mut attempts = Vec::with_capacity(order.len() + 1);
    for provider in order {
        let Some(client) = state.services.chat_client(provider) else {
            continue;
        };
        let attempt = call_provider(client, intent, message).await;
        let reply = attempt.response.clone().filter(|_| attempt.success);
        attempts.push(attempt);
        if let Some(reply) = reply {
            return Answer {
                intent,
                reply,
                provider: provider.to_string(),
                attempts,
            };
        }
    }

    let reply = canned_reply(message, intent);
    attempts.push(AiInteraction {
        id: uuid::Uuid::new_v4().to_string(),
        provider: FALLBACK_PROVIDER.to_string(),
        model: "canned".to_string(),
        intent,
        prompt: message.to_string(),
        response: Some(reply.clone()),
        latency_ms: 0,
        success: true,
        error: None,
        created_at: Utc::now(),
    });
    Answer {
        intent,
        reply,
        provider: FALLBACK_PROVIDER.to_string(),
        attempts,
    }
}
