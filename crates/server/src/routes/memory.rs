use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;

use jarvis_api::{ClearExpiredResponse, MemoryEntry, MemoryParams, NewMemory, ScoredMemory};
use jarvis_core::memory::{MemoryError, MemoryKind, MemoryQuery};

use crate::AppState;
use crate::error::ApiErr;

fn memory_err(e: MemoryError) -> ApiErr {
    match e {
        MemoryError::EmptyContent => ApiErr::bad_request(e.to_string()),
        MemoryError::Io(_) => ApiErr::from_db("write memory file")(e),
    }
}

/// GET /api/memory: scored recall, best match first.
pub async fn recall(
    State(state): State<AppState>,
    Query(params): Query<MemoryParams>,
) -> Result<Json<Vec<ScoredMemory>>, ApiErr> {
    let kind = match params.kind.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            MemoryKind::parse(raw)
                .ok_or_else(|| ApiErr::bad_request(format!("unknown memory kind: {raw}")))?,
        ),
    };
    let tags = params
        .tags
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    let query = MemoryQuery {
        text: params.q.filter(|q| !q.trim().is_empty()),
        tags,
        kind,
        limit: params.limit,
    };
    let store = state.memory.read().await;
    Ok(Json(store.recall(&query, Utc::now())))
}

/// POST /api/memory
pub async fn remember(
    State(state): State<AppState>,
    Json(new): Json<NewMemory>,
) -> Result<(StatusCode, Json<MemoryEntry>), ApiErr> {
    let entry = state
        .memory
        .write()
        .await
        .add(new, Utc::now())
        .map_err(memory_err)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/memory/expired
pub async fn clear_expired(
    State(state): State<AppState>,
) -> Result<Json<ClearExpiredResponse>, ApiErr> {
    let removed = state
        .memory
        .write()
        .await
        .clear_expired(Utc::now())
        .map_err(memory_err)?;
    if removed > 0 {
        tracing::info!(removed, "expired memories cleared");
    }
    Ok(Json(ClearExpiredResponse { removed }))
}
