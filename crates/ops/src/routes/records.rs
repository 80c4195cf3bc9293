//! Diagnostics, corrections and improvement suggestions: append and list.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;

use jarvis_core::ops::{
    Correction, CorrectionFilter, Diagnostic, DiagnosticFilter, Improvement, ImprovementFilter,
    NewCorrection, NewDiagnostic, NewImprovement, query_corrections, query_diagnostics,
    query_improvements,
};

use crate::Stores;
use crate::error::ApiErr;

fn required(field: &str, value: &str) -> Result<(), ApiErr> {
    if value.trim().is_empty() {
        return Err(ApiErr::bad_request(format!("{field} is required")));
    }
    Ok(())
}

pub async fn create_diagnostic(
    State(stores): State<Stores>,
    Json(new): Json<NewDiagnostic>,
) -> Result<(StatusCode, Json<Diagnostic>), ApiErr> {
    required("description", &new.description)?;
    let diagnostic = Diagnostic::create(new, Utc::now());
    stores.diagnostics.push(diagnostic.clone()).await?;
    tracing::info!(id = %diagnostic.id, severity = ?diagnostic.severity, "diagnostic recorded");
    Ok((StatusCode::CREATED, Json(diagnostic)))
}

/// GET /diagnostics: most severe first.
pub async fn list_diagnostics(
    State(stores): State<Stores>,
    Query(filter): Query<DiagnosticFilter>,
) -> Result<Json<Vec<Diagnostic>>, ApiErr> {
    Ok(Json(query_diagnostics(stores.diagnostics.load().await, &filter)?))
}

pub async fn create_correction(
    State(stores): State<Stores>,
    Json(new): Json<NewCorrection>,
) -> Result<(StatusCode, Json<Correction>), ApiErr> {
    required("description", &new.description)?;
    let correction = Correction::create(new, Utc::now());
    stores.corrections.push(correction.clone()).await?;
    tracing::info!(id = %correction.id, applied = correction.applied, "correction recorded");
    Ok((StatusCode::CREATED, Json(correction)))
}

/// GET /corrections: newest first.
pub async fn list_corrections(
    State(stores): State<Stores>,
    Query(filter): Query<CorrectionFilter>,
) -> Result<Json<Vec<Correction>>, ApiErr> {
    Ok(Json(query_corrections(stores.corrections.load().await, &filter)?))
}

pub async fn create_improvement(
    State(stores): State<Stores>,
    Json(new): Json<NewImprovement>,
) -> Result<(StatusCode, Json<Improvement>), ApiErr> {
    required("title", &new.title)?;
    let improvement = Improvement::create(new, Utc::now());
    stores.improvements.push(improvement.clone()).await?;
    tracing::info!(id = %improvement.id, "improvement suggested");
    Ok((StatusCode::CREATED, Json(improvement)))
}

/// GET /improvements: highest priority first.
pub async fn list_improvements(
    State(stores): State<Stores>,
    Query(filter): Query<ImprovementFilter>,
) -> Result<Json<Vec<Improvement>>, ApiErr> {
    Ok(Json(query_improvements(stores.improvements.load().await, &filter)?))
}
