//! Shared API types and SQL builders for the JARVIS dashboard.
//!
//! Request/response shapes used by `jarvis-server`, `jarvis-ops` and
//! `jarvis-api-client` live here. TypeScript types for the React client are
//! generated via `ts-rs`:
//!   cargo test -p jarvis-api --features ts -- export_typescript --nocapture

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub mod db;

// Domain types the API hands out unchanged.
pub use jarvis_core::agents::{AgentReport, CycleResult, OrchestratorStatus};
pub use jarvis_core::intelligence::{AiInteraction, ProviderMetrics};
pub use jarvis_core::memory::{MemoryEntry, NewMemory, ScoredMemory};
pub use jarvis_core::mock::{AiTrend, GovernmentBid, GovernmentOfficial};
pub use jarvis_core::ops::{
    Correction, Diagnostic, Improvement, NewCorrection, NewDiagnostic, NewImprovement, NewTask,
    StatusSummary, Task,
};

/// Id of the single dashboard owner. Chat history belongs to this user.
pub const DEFAULT_USER_ID: &str = "owner";

/// Timestamp format stored in SQLite and sent on the wire.
///
/// Fixed-width UTC so that text ordering matches time ordering.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ─── Shared ──────────────────────────────────────────────────────────────────

/// Returned by `GET /api/health`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct OkResponse {
    pub ok: bool,
}

/// JSON error shape `{ "error": "..." }` returned by all error responses.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ApiError {
    pub error: String,
}

/// `?limit=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

impl LimitQuery {
    pub fn resolve(&self, default: u32, max: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, max)
    }
}

// ─── Chat ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: String,
    pub content: String,
    /// `true` for the owner's messages, `false` for JARVIS replies.
    pub is_user: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct VoiceCommandRequest {
    #[serde(alias = "command", alias = "message")]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct VoiceCommandResponse {
    pub user_message: ChatMessage,
    pub bot_message: ChatMessage,
    pub intent: String,
    /// Provider that produced the reply, or `fallback`.
    pub provider: String,
}

// ─── Dashboard panels ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct BusinessStats {
    pub id: i64,
    pub monthly_revenue: f64,
    pub active_trucks: i64,
    pub monthly_deliveries: i64,
    pub hectares_planted: f64,
    pub open_opportunities: i64,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreditOpportunity {
    pub id: i64,
    pub title: String,
    pub provider: String,
    pub description: String,
    pub category: String,
    /// Monthly rate in percent.
    pub interest_rate: f64,
    pub max_amount: f64,
    pub deadline: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct MetaAd {
    pub id: i64,
    pub title: String,
    pub advertiser: String,
    pub description: String,
    pub category: String,
    pub cta_url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct BusinessSuggestion {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub estimated_impact: String,
    pub created_at: String,
}

// ─── News ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub image_url: Option<String>,
    pub category: String,
    /// 0–100.
    pub relevance: i64,
    pub sentiment: String,
    pub published_at: String,
    pub created_at: String,
}

/// `GET /api/news` query.
#[derive(Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewsQuery {
    #[serde(default)]
    pub category: Option<String>,
    /// Fetch from the news provider before listing.
    #[serde(default)]
    pub refresh: Option<bool>,
    #[serde(default)]
    pub limit: Option<u32>,
}

// ─── Planning ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct StrategicDecision {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub impact: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewStrategicDecision {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct EnhancedTask {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub due_date: Option<String>,
    pub assigned_agent: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewEnhancedTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assigned_agent: Option<String>,
}

/// Status values that count as "still open" for planning rows.
pub const OPEN_STATUSES: &[&str] = &["pending", "in_progress"];

// ─── Intelligence ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RetryRequest {
    pub interaction_id: String,
    pub provider: String,
}

/// Returned by `POST /api/intelligence/optimize`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct OptimizeResponse {
    /// intent → provider.
    pub mappings: std::collections::BTreeMap<String, String>,
    pub sample_size: usize,
}

// ─── Voice / notifications ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TtsRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TtsPrepareResponse {
    pub text: String,
    pub cache_key: String,
    pub cached: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SlackNotifyRequest {
    pub text: String,
    #[serde(default)]
    pub channel: Option<String>,
}

// ─── Memory / agents ─────────────────────────────────────────────────────────

/// `GET /api/memory` query. `tags` is comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct MemoryParams {
    pub q: Option<String>,
    pub tags: Option<String>,
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ClearExpiredResponse {
    pub removed: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CommunicationGuide {
    pub topic: String,
    pub content: String,
}

// ─── Management / commands ───────────────────────────────────────────────────

/// Returned by `GET /api/management/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ManagementStatus {
    pub online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entry in `comandos-pendentes.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct PendingCommand {
    pub id: String,
    #[serde(alias = "comando")]
    pub command: String,
    #[serde(default)]
    pub args: serde_json::Value,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ExecuteCommandRequest {
    #[serde(alias = "comando")]
    pub command: String,
    #[serde(default)]
    pub args: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct PendingCommandsResponse {
    pub commands: Vec<PendingCommand>,
}

// ─── TypeScript generation ───────────────────────────────────────────────────

#[cfg(all(test, feature = "ts"))]
mod ts_export {
    use super::*;
    use std::path::PathBuf;
    use ts_rs::TS;

    /// Run with: cargo test -p jarvis-api --features ts -- export_typescript --nocapture
    #[test]
    fn export_typescript() {
        let out = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../web/src/api-types.generated.ts");

        let cfg = ts_rs::Config::new().with_large_int("number");
        let mut parts: Vec<String> = vec![
            "// AUTO-GENERATED by jarvis-api: DO NOT EDIT".to_string(),
            String::new(),
        ];

        macro_rules! collect_ts {
            ($($t:ty),+ $(,)?) => {
                $(
                    let decl = <$t>::decl(&cfg);
                    let decl = if decl.contains(" = {") {
                        decl.replacen("type ", "export interface ", 1)
                            .replace(" = {", " {")
                            .trim_end_matches(';')
                            .to_string()
                    } else {
                        decl.replacen("type ", "export type ", 1)
                            .trim_end_matches(';')
                            .to_string()
                    };
                    parts.push(decl);
                    parts.push(String::new());
                )+
            };
        }

        collect_ts!(
            HealthResponse,
            OkResponse,
            ApiError,
            ChatMessage,
            VoiceCommandRequest,
            VoiceCommandResponse,
            BusinessStats,
            CreditOpportunity,
            MetaAd,
            BusinessSuggestion,
            NewsArticle,
            NewsQuery,
            StrategicDecision,
            NewStrategicDecision,
            EnhancedTask,
            NewEnhancedTask,
            RetryRequest,
            OptimizeResponse,
            TtsRequest,
            TtsPrepareResponse,
            SlackNotifyRequest,
            ClearExpiredResponse,
            CommunicationGuide,
            PendingCommand,
            ExecuteCommandRequest,
            PendingCommandsResponse,
        );

        let content = parts.join("\n");
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).expect("create output dir");
        }
        std::fs::write(&out, content).expect("write generated types");
        println!("wrote {}", out.display());
    }
}
