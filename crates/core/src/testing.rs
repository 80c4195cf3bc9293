use chrono::Utc;

use crate::assistant::Intent;
use crate::intelligence::AiInteraction;
use crate::memory::{MemoryKind, NewMemory};

/// Logged interaction with fixed prompt/model values.
pub fn interaction(provider: &str, intent: Intent, success: bool, latency_ms: i64) -> AiInteraction {
    AiInteraction {
        id: format!("test-{}", uuid::Uuid::new_v4().simple()),
        provider: provider.to_string(),
        model: "test-model".to_string(),
        intent,
        prompt: "qual o frete?".to_string(),
        response: success.then(|| "resposta".to_string()),
        latency_ms,
        success,
        error: (!success).then(|| "upstream error".to_string()),
        created_at: Utc::now(),
    }
}

/// Fact memory with the given tags.
pub fn fact(content: &str, importance: f32, tags: &[&str]) -> NewMemory {
    NewMemory {
        kind: MemoryKind::Fact,
        content: content.to_string(),
        importance,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        expires_at: None,
    }
}
