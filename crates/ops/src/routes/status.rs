use axum::{Json, extract::State};
use serde_json::{Value, json};

use jarvis_core::ops::{StatusSummary, status_summary};

use crate::Stores;

/// GET /: service banner.
pub async fn banner() -> Json<Value> {
    Json(json!({
        "service": "jarvis-ops",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/tasks",
            "/diagnostics",
            "/corrections",
            "/improvements",
            "/status",
            "/orchestrator/cycles",
            "/orchestrator/execute-cycle",
        ],
    }))
}

/// GET /status: record counts across all collections.
pub async fn status(State(stores): State<Stores>) -> Json<StatusSummary> {
    let tasks = stores.tasks.load().await;
    let diagnostics = stores.diagnostics.load().await;
    let corrections = stores.corrections.load().await;
    let improvements = stores.improvements.load().await;
    Json(status_summary(&tasks, &diagnostics, &corrections, &improvements))
}
