//! Proxy to the dashboard server's system orchestrator.

use axum::{Json, extract::State};

use jarvis_api_client::DashboardClient;
use jarvis_core::agents::{CycleResult, OrchestratorStatus};

use crate::error::ApiErr;

/// GET /orchestrator/cycles
pub async fn cycles(
    State(dashboard): State<DashboardClient>,
) -> Result<Json<OrchestratorStatus>, ApiErr> {
    dashboard
        .orchestrator_status()
        .await
        .map(Json)
        .map_err(ApiErr::from_dashboard)
}

/// POST /orchestrator/execute-cycle
pub async fn execute_cycle(
    State(dashboard): State<DashboardClient>,
) -> Result<Json<CycleResult>, ApiErr> {
    let result = dashboard
        .execute_cycle()
        .await
        .map_err(ApiErr::from_dashboard)?;
    tracing::info!(cycle = result.cycle, "orchestrator cycle triggered");
    Ok(Json(result))
}
