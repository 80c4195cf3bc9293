use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use chrono::Utc;

use jarvis_api::{ExecuteCommandRequest, PendingCommand, PendingCommandsResponse, timestamp};

use crate::AppState;
use crate::error::ApiErr;

/// Check `Authorization: Bearer <token>` against the configured command token.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiErr> {
    let expected = state
        .config
        .command_token
        .as_deref()
        .ok_or_else(|| ApiErr::unavailable("command endpoint is not configured"))?;
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| ApiErr::unauthorized("missing bearer token"))?;
    if provided != expected {
        return Err(ApiErr::unauthorized("invalid token"));
    }
    Ok(())
}

/// POST /api/commands/execute: queue a command for the external worker.
pub async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ExecuteCommandRequest>,
) -> Result<(StatusCode, Json<PendingCommand>), ApiErr> {
    authorize(&state, &headers)?;
    let command = req.command.trim();
    if command.is_empty() {
        return Err(ApiErr::bad_request("command is required"));
    }
    let pending = PendingCommand {
        id: uuid::Uuid::new_v4().to_string(),
        command: command.to_string(),
        args: req.args.unwrap_or_else(|| serde_json::json!({})),
        created_at: timestamp(Utc::now()),
    };
    let queued = state
        .commands
        .push(pending.clone())
        .await
        .map_err(ApiErr::from_db("write command queue"))?;
    tracing::info!(command = %pending.command, queued, "command queued");
    Ok((StatusCode::CREATED, Json(pending)))
}

/// GET /api/commands/pending
pub async fn pending(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PendingCommandsResponse>, ApiErr> {
    authorize(&state, &headers)?;
    Ok(Json(PendingCommandsResponse {
        commands: state.commands.pending().await,
    }))
}
