use axum::{
    Json,
    extract::{Query, State},
};

use jarvis_api::{AiInteraction, LimitQuery, OptimizeResponse, ProviderMetrics, RetryRequest, db};
use jarvis_core::intelligence::{Provider, optimize_mappings, provider_metrics};

use crate::AppState;
use crate::assistant::call_provider;
use crate::error::ApiErr;
use crate::storage::{Db, insert_interaction, interaction_from_row, sq_query_map, sq_query_row};

fn load_all(db: &Db) -> Result<Vec<AiInteraction>, ApiErr> {
    let conn = db.conn();
    sq_query_map(&conn, db::interactions::list(None), interaction_from_row)
        .map_err(ApiErr::from_db("list AI interactions"))
}

/// GET /api/intelligence/interactions: newest first.
pub async fn interactions(
    State(db): State<Db>,
    Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<AiInteraction>>, ApiErr> {
    let conn = db.conn();
    sq_query_map(
        &conn,
        db::interactions::list(Some(q.resolve(50, 500))),
        interaction_from_row,
    )
    .map(Json)
    .map_err(ApiErr::from_db("list AI interactions"))
}

/// GET /api/intelligence/metrics: per-provider success rate and latency.
pub async fn metrics(State(db): State<Db>) -> Result<Json<Vec<ProviderMetrics>>, ApiErr> {
    Ok(Json(provider_metrics(&load_all(&db)?)))
}

/// POST /api/intelligence/retry: replay a logged prompt against another provider.
pub async fn retry(
    State(state): State<AppState>,
    Json(req): Json<RetryRequest>,
) -> Result<Json<AiInteraction>, ApiErr> {
    let provider = Provider::parse(&req.provider)
        .ok_or_else(|| ApiErr::bad_request(format!("unknown provider: {}", req.provider)))?;
    let original = {
        let conn = state.db.conn();
        match sq_query_row(&conn, db::interactions::get(&req.interaction_id), interaction_from_row) {
            Ok(i) => i,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(ApiErr::not_found("interaction not found"));
            }
            Err(e) => return Err(ApiErr::from_db("read AI interaction")(e)),
        }
    };
    let client = state
        .services
        .chat_client(provider)
        .ok_or_else(|| ApiErr::unavailable(format!("{provider} is not configured")))?;

    let attempt = call_provider(client, original.intent, &original.prompt).await;
    {
        let conn = state.db.conn();
        insert_interaction(&conn, &attempt).map_err(ApiErr::from_db("log AI interaction"))?;
    }
    tracing::info!(
        original = %original.id,
        provider = %provider,
        success = attempt.success,
        "interaction retried"
    );
    Ok(Json(attempt))
}

/// POST /api/intelligence/optimize: recompute intent → provider mappings
/// from the interaction log and use them for routing from now on.
pub async fn optimize(State(state): State<AppState>) -> Result<Json<OptimizeResponse>, ApiErr> {
    let log = load_all(&state.db)?;
    let mappings = optimize_mappings(&log);
    let response = OptimizeResponse {
        mappings: mappings
            .iter()
            .map(|(intent, provider)| (intent.as_str().to_string(), provider.as_str().to_string()))
            .collect(),
        sample_size: log.len(),
    };
    *state.mappings.write().await = mappings;
    tracing::info!(intents = response.mappings.len(), "provider mappings optimized");
    Ok(Json(response))
}
