//! Provider bookkeeping for the intelligence panel: per-provider metrics,
//! intent → provider mappings and the order providers are tried in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::assistant::Intent;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Perplexity,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Self::OpenAi, Self::Anthropic, Self::Perplexity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Perplexity => "perplexity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "gpt" => Some(Self::OpenAi),
            "anthropic" | "claude" => Some(Self::Anthropic),
            "perplexity" => Some(Self::Perplexity),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged provider call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiInteraction {
    pub id: String,
    /// Provider name, or `fallback` when the canned reply was used.
    pub provider: String,
    pub model: String,
    pub intent: Intent,
    pub prompt: String,
    pub response: Option<String>,
    pub latency_ms: i64,
    pub success: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderMetrics {
    pub provider: String,
    pub calls: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub avg_latency_ms: f64,
}

/// Aggregate interactions per provider, sorted by provider name.
pub fn provider_metrics(interactions: &[AiInteraction]) -> Vec<ProviderMetrics> {
    let mut acc: BTreeMap<&str, (usize, usize, i64)> = BTreeMap::new();
    for i in interactions {
        let slot = acc.entry(i.provider.as_str()).or_default();
        slot.0 += 1;
        if i.success {
            slot.1 += 1;
        }
        slot.2 += i.latency_ms.max(0);
    }
    acc.into_iter()
        .map(|(provider, (calls, successes, latency))| ProviderMetrics {
            provider: provider.to_string(),
            calls,
            successes,
            success_rate: successes as f64 / calls as f64,
            avg_latency_ms: latency as f64 / calls as f64,
        })
        .collect()
}

/// Intent → preferred provider.
pub type ProviderMappings = BTreeMap<Intent, Provider>;

/// Pick the best provider for each intent seen in `interactions`.
///
/// Highest success rate wins, then lower average latency, then provider name.
/// Interactions that did not go to a real provider are ignored.
pub fn optimize_mappings(interactions: &[AiInteraction]) -> ProviderMappings {
    let mut per_intent: BTreeMap<Intent, BTreeMap<Provider, (usize, usize, i64)>> =
        BTreeMap::new();
    for i in interactions {
        let Some(provider) = Provider::parse(&i.provider) else {
            continue;
        };
        let slot = per_intent
            .entry(i.intent)
            .or_default()
            .entry(provider)
            .or_default();
        slot.0 += 1;
        if i.success {
            slot.1 += 1;
        }
        slot.2 += i.latency_ms.max(0);
    }

    per_intent
        .into_iter()
        .filter_map(|(intent, providers)| {
            providers
                .into_iter()
                .map(|(provider, (calls, ok, latency))| {
                    (provider, ok as f64 / calls as f64, latency as f64 / calls as f64)
                })
                .min_by(|a, b| {
                    b.1.total_cmp(&a.1)
                        .then_with(|| a.2.total_cmp(&b.2))
                        .then_with(|| a.0.as_str().cmp(b.0.as_str()))
                })
                .map(|(provider, _, _)| (intent, provider))
        })
        .collect()
}

/// Order in which configured providers are tried for `intent`.
///
/// Mapped provider first, then the default, then the rest in declaration order.
/// Providers missing from `configured` are skipped.
pub fn route(
    intent: Intent,
    mappings: &ProviderMappings,
    default: Option<Provider>,
    configured: &[Provider],
) -> Vec<Provider> {
    let mut order = Vec::with_capacity(configured.len());
    let candidates = mappings
        .get(&intent)
        .copied()
        .into_iter()
        .chain(default)
        .chain(Provider::ALL);
    for p in candidates {
        if configured.contains(&p) && !order.contains(&p) {
            order.push(p);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::interaction;

    #[test]
    fn metrics_aggregate_per_provider() {
        let log = vec![
            interaction("openai", Intent::General, true, 100),
            interaction("openai", Intent::General, false, 300),
            interaction("anthropic", Intent::Farm, true, 50),
        ];
        let m = provider_metrics(&log);
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].provider, "anthropic");
        assert_eq!(m[1].calls, 2);
        assert_eq!(m[1].success_rate, 0.5);
        assert_eq!(m[1].avg_latency_ms, 200.0);
    }

    #[test]
    fn optimize_prefers_success_then_latency() {
        let log = vec![
            interaction("openai", Intent::Farm, true, 900),
            interaction("anthropic", Intent::Farm, true, 200),
            interaction("perplexity", Intent::Farm, false, 10),
            interaction("openai", Intent::Transport, true, 500),
            interaction("anthropic", Intent::Transport, false, 100),
            interaction("fallback", Intent::General, true, 0),
        ];
        let mappings = optimize_mappings(&log);
        assert_eq!(mappings.get(&Intent::Farm), Some(&Provider::Anthropic));
        assert_eq!(mappings.get(&Intent::Transport), Some(&Provider::OpenAi));
        assert!(!mappings.contains_key(&Intent::General));
    }

    #[test]
    fn optimize_breaks_full_ties_by_provider_name() {
        let log = vec![
            interaction("openai", Intent::Farm, true, 100),
            interaction("anthropic", Intent::Farm, true, 100),
            interaction("perplexity", Intent::Farm, true, 100),
        ];
        let mappings = optimize_mappings(&log);
        assert_eq!(mappings.get(&Intent::Farm), Some(&Provider::Anthropic));
    }

    #[test]
    fn route_orders_mapped_default_then_rest() {
        let mut mappings = ProviderMappings::new();
        mappings.insert(Intent::Farm, Provider::Perplexity);
        let configured = [Provider::OpenAi, Provider::Anthropic, Provider::Perplexity];

        assert_eq!(
            route(Intent::Farm, &mappings, Some(Provider::Anthropic), &configured),
            vec![Provider::Perplexity, Provider::Anthropic, Provider::OpenAi]
        );
        assert_eq!(
            route(Intent::General, &mappings, None, &configured[..1]),
            vec![Provider::OpenAi]
        );
        assert!(route(Intent::General, &mappings, None, &[]).is_empty());
    }

    #[test]
    fn provider_serializes_with_wire_names() {
        assert_eq!(serde_json::to_string(&Provider::OpenAi).unwrap(), "\"openai\"");
        assert_eq!(Provider::parse("Claude"), Some(Provider::Anthropic));
    }
}
