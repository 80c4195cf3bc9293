use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{Map, Value};

use jarvis_core::ops::{self, NewTask, Task, TaskFilter, query_tasks};

use crate::Stores;
use crate::error::ApiErr;

/// POST /tasks
pub async fn create_task(
    State(stores): State<Stores>,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiErr> {
    if new.title.trim().is_empty() {
        return Err(ApiErr::bad_request("title is required"));
    }
    let task = Task::create(new, Utc::now());
    stores.tasks.push(task.clone()).await?;
    tracing::info!(id = %task.id, priority = ?task.priority, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks: most urgent first.
pub async fn list_tasks(
    State(stores): State<Stores>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<Task>>, ApiErr> {
    let tasks = query_tasks(stores.tasks.load().await, &filter)?;
    Ok(Json(tasks))
}

/// GET /tasks/{id}
pub async fn get_task(
    State(stores): State<Stores>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiErr> {
    stores
        .tasks
        .load()
        .await
        .into_iter()
        .find(|t| t.id == id)
        .map(Json)
        .ok_or_else(|| ApiErr::from(ops::OpsError::TaskNotFound(id)))
}

/// PATCH /tasks/{id}: merge the body into the stored task.
pub async fn patch_task(
    State(stores): State<Stores>,
    Path(id): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<Json<Task>, ApiErr> {
    let now = Utc::now();
    let task = stores
        .tasks
        .modify(|tasks| ops::patch_task(tasks, &id, patch, now).map_err(ApiErr::from))
        .await?;
    tracing::info!(id = %task.id, state = ?task.state, "task updated");
    Ok(Json(task))
}
