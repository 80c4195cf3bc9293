//! AI interaction log query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::AiInteractions;

/// Column order matches `interaction_from_row()`.
const COLUMNS: [AiInteractions; 10] = [
    AiInteractions::Id,
    AiInteractions::Provider,
    AiInteractions::Model,
    AiInteractions::Intent,
    AiInteractions::Prompt,
    AiInteractions::Response,
    AiInteractions::LatencyMs,
    AiInteractions::Success,
    AiInteractions::Error,
    AiInteractions::CreatedAt,
];

pub struct InsertParams<'a> {
    pub id: &'a str,
    pub provider: &'a str,
    pub model: &'a str,
    pub intent: &'a str,
    pub prompt: &'a str,
    pub response: Option<&'a str>,
    pub latency_ms: i64,
    pub success: bool,
    pub error: Option<&'a str>,
    pub created_at: &'a str,
}

pub fn insert(p: &InsertParams<'_>) -> Built {
    Query::insert()
        .into_table(AiInteractions::Table)
        .columns(COLUMNS)
        .values_panic([
            p.id.into(),
            p.provider.into(),
            p.model.into(),
            p.intent.into(),
            p.prompt.into(),
            p.response.map(str::to_string).into(),
            p.latency_ms.into(),
            p.success.into(),
            p.error.map(str::to_string).into(),
            p.created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get(id: &str) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(AiInteractions::Table)
        .and_where(Expr::col(AiInteractions::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Newest first. `None` returns the whole log (metrics, optimisation).
pub fn list(limit: Option<u32>) -> Built {
    let mut q = Query::select()
        .columns(COLUMNS)
        .from(AiInteractions::Table)
        .order_by(AiInteractions::CreatedAt, Order::Desc)
        .to_owned();
    if let Some(limit) = limit {
        q.limit(u64::from(limit));
    }
    q.build(SqliteQueryBuilder)
}
