//! Bridge to the `jarvis-ops` management API.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::collections::HashMap;

use jarvis_api::{ManagementStatus, NewTask, Task};
use jarvis_api_client::ClientError;

use crate::Services;
use crate::error::ApiErr;

/// 4xx answers from the ops API are the caller's fault and pass through as 400.
fn ops_err(e: ClientError) -> ApiErr {
    match e {
        ClientError::Status { status, ref body } if (400..500).contains(&status) => {
            let message = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("error")?.as_str().map(str::to_string))
                .unwrap_or_else(|| body.clone());
            ApiErr::bad_request(message)
        }
        e => ApiErr::from_upstream("management API")(e),
    }
}

/// GET /api/management/status: never fails; reports `online: false` instead.
pub async fn status(State(services): State<Services>) -> Json<ManagementStatus> {
    match services.ops.status().await {
        Ok(status) => Json(ManagementStatus {
            online: true,
            status: Some(status),
            error: None,
        }),
        Err(e) => {
            tracing::debug!(url = services.ops.base_url(), "management API offline: {e}");
            Json(ManagementStatus {
                online: false,
                status: None,
                error: Some(e.to_string()),
            })
        }
    }
}

/// GET /api/management/tasks: query string forwarded unchanged.
pub async fn list_tasks(
    State(services): State<Services>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Task>>, ApiErr> {
    services.ops.list_tasks(&query).await.map(Json).map_err(ops_err)
}

/// POST /api/management/tasks
pub async fn create_task(
    State(services): State<Services>,
    Json(task): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiErr> {
    let created = services.ops.create_task(&task).await.map_err(ops_err)?;
    Ok((StatusCode::CREATED, Json(created)))
}
