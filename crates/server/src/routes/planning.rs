use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;

use jarvis_api::{
    EnhancedTask, LimitQuery, NewEnhancedTask, NewStrategicDecision, StrategicDecision, db,
    timestamp,
};

use crate::error::ApiErr;
use crate::storage::{Db, decision_from_row, sq_execute, sq_query_map, sq_query_row, task_from_row};

const TASK_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];
const TASK_STATUSES: &[&str] = &["pending", "in_progress", "done", "cancelled"];

fn required(field: &str, value: &str) -> Result<(), ApiErr> {
    if value.trim().is_empty() {
        return Err(ApiErr::bad_request(format!("{field} is required")));
    }
    Ok(())
}

fn one_of<'a>(field: &str, value: Option<&'a str>, allowed: &[&str], default: &'a str) -> Result<&'a str, ApiErr> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) if allowed.contains(&v) => Ok(v),
        Some(v) => Err(ApiErr::bad_request(format!(
            "invalid {field} {v:?}, expected one of {}",
            allowed.join(", ")
        ))),
    }
}

/// GET /api/strategic-decisions: newest first.
pub async fn list_decisions(
    State(db): State<Db>,
    Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<StrategicDecision>>, ApiErr> {
    let conn = db.conn();
    sq_query_map(&conn, db::planning::list_decisions(q.resolve(100, 500)), decision_from_row)
        .map(Json)
        .map_err(ApiErr::from_db("list strategic decisions"))
}

/// POST /api/strategic-decisions
pub async fn create_decision(
    State(db): State<Db>,
    Json(req): Json<NewStrategicDecision>,
) -> Result<(StatusCode, Json<StrategicDecision>), ApiErr> {
    required("title", &req.title)?;
    let conn = db.conn();
    sq_execute(
        &conn,
        db::planning::insert_decision(
            req.title.trim(),
            req.description.trim(),
            req.category.as_deref().unwrap_or("general"),
            req.impact.as_deref().unwrap_or("medium"),
            req.status.as_deref().unwrap_or("pending"),
            &timestamp(Utc::now()),
        ),
    )
    .map_err(ApiErr::from_db("insert strategic decision"))?;
    let id = conn.last_insert_rowid();
    let decision = sq_query_row(&conn, db::planning::get_decision(id), decision_from_row)
        .map_err(ApiErr::from_db("read strategic decision"))?;
    Ok((StatusCode::CREATED, Json(decision)))
}

/// GET /api/enhanced-tasks: newest first.
pub async fn list_tasks(
    State(db): State<Db>,
    Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<EnhancedTask>>, ApiErr> {
    let conn = db.conn();
    sq_query_map(&conn, db::planning::list_tasks(q.resolve(100, 500)), task_from_row)
        .map(Json)
        .map_err(ApiErr::from_db("list enhanced tasks"))
}

/// POST /api/enhanced-tasks
pub async fn create_task(
    State(db): State<Db>,
    Json(req): Json<NewEnhancedTask>,
) -> Result<(StatusCode, Json<EnhancedTask>), ApiErr> {
    required("title", &req.title)?;
    let priority = one_of("priority", req.priority.as_deref(), TASK_PRIORITIES, "medium")?;
    let status = one_of("status", req.status.as_deref(), TASK_STATUSES, "pending")?;

    let conn = db.conn();
    sq_execute(
        &conn,
        db::planning::insert_task(&db::planning::TaskParams {
            title: req.title.trim(),
            description: req.description.trim(),
            category: req.category.as_deref().unwrap_or("general"),
            priority,
            status,
            due_date: req.due_date.as_deref(),
            assigned_agent: req.assigned_agent.as_deref(),
            created_at: &timestamp(Utc::now()),
        }),
    )
    .map_err(ApiErr::from_db("insert enhanced task"))?;
    let id = conn.last_insert_rowid();
    let task = sq_query_row(&conn, db::planning::get_task(id), task_from_row)
        .map_err(ApiErr::from_db("read enhanced task"))?;
    Ok((StatusCode::CREATED, Json(task)))
}
