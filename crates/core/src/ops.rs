//! Management records: tasks, diagnostics, corrections and improvement
//! suggestions tracked by the management API, plus their list queries.
//!
//! Input fields accept the Portuguese names used by older clients
//! (`titulo`, `estado`, `severidade`, ...); output is always English.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    #[error("limit must be between 1 and {MAX_LIMIT}, got {0}")]
    InvalidLimit(usize),
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("invalid task update: {0}")]
    InvalidPatch(String),
}

/// Validate an optional `limit` query parameter.
pub fn resolve_limit(limit: Option<usize>) -> Result<usize, OpsError> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
        Some(n) => Err(OpsError::InvalidLimit(n)),
    }
}

// ─── Enums ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    #[default]
    #[serde(alias = "pendente")]
    Pending,
    #[serde(alias = "em_andamento")]
    InProgress,
    #[serde(alias = "concluida")]
    Done,
    #[serde(alias = "falha")]
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[serde(alias = "baixa")]
    Low,
    #[default]
    Normal,
    #[serde(alias = "alta")]
    High,
    #[serde(alias = "critica")]
    Critical,
}

impl TaskPriority {
    /// Sort rank; lower runs first.
    fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Normal => 2,
            Self::Low => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    #[serde(alias = "sistema")]
    System,
    #[serde(alias = "agente")]
    Agent,
    #[serde(alias = "tarefa")]
    Task,
    #[serde(alias = "conexao")]
    Connection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    #[serde(alias = "aviso")]
    Warning,
    #[serde(alias = "erro")]
    Error,
    #[serde(alias = "critico")]
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementKind {
    #[serde(alias = "otimizacao")]
    Optimization,
    #[serde(alias = "nova_funcionalidade")]
    NewFeature,
    #[serde(alias = "correcao")]
    Fix,
    #[serde(alias = "arquitetura")]
    Architecture,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementPriority {
    #[serde(alias = "baixa")]
    Low,
    #[default]
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "alta")]
    High,
}

impl ImprovementPriority {
    fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "estado")]
    pub state: TaskState,
    #[serde(default, alias = "agente_responsavel")]
    pub assigned_agent: Option<String>,
    #[serde(default, alias = "prioridade")]
    pub priority: TaskPriority,
    #[serde(alias = "timestamp_criacao")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "timestamp_atualizacao")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "resultado")]
    pub result: Option<String>,
    #[serde(default, alias = "contexto")]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "estado")]
    pub state: TaskState,
    #[serde(default, alias = "agente_responsavel")]
    pub assigned_agent: Option<String>,
    #[serde(default, alias = "prioridade")]
    pub priority: TaskPriority,
    #[serde(default, alias = "contexto")]
    pub context: Option<serde_json::Value>,
}

impl Task {
    pub fn create(new: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            state: new.state,
            assigned_agent: new.assigned_agent,
            priority: new.priority,
            created_at: now,
            updated_at: None,
            result: None,
            context: new.context,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    pub id: String,
    #[serde(alias = "tipo")]
    pub kind: DiagnosticKind,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "severidade")]
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "detalhes")]
    pub details: Option<serde_json::Value>,
    #[serde(default, alias = "sugestoes")]
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDiagnostic {
    #[serde(alias = "tipo")]
    pub kind: DiagnosticKind,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "severidade")]
    pub severity: Severity,
    #[serde(default, alias = "detalhes")]
    pub details: Option<serde_json::Value>,
    #[serde(default, alias = "sugestoes")]
    pub suggestions: Option<Vec<String>>,
}

impl Diagnostic {
    pub fn create(new: NewDiagnostic, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: new.kind,
            description: new.description,
            severity: new.severity,
            timestamp: now,
            details: new.details,
            suggestions: new.suggestions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Correction {
    pub id: String,
    #[serde(default, alias = "diagnostico_id")]
    pub diagnostic_id: Option<String>,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "codigo")]
    pub code: Option<String>,
    #[serde(default, alias = "aplicada")]
    pub applied: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "resultado")]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCorrection {
    #[serde(default, alias = "diagnostico_id")]
    pub diagnostic_id: Option<String>,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "codigo")]
    pub code: Option<String>,
    #[serde(default, alias = "aplicada")]
    pub applied: bool,
    #[serde(default, alias = "resultado")]
    pub result: Option<String>,
}

impl Correction {
    pub fn create(new: NewCorrection, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            diagnostic_id: new.diagnostic_id,
            description: new.description,
            code: new.code,
            applied: new.applied,
            timestamp: now,
            result: new.result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Improvement {
    pub id: String,
    #[serde(alias = "tipo")]
    pub kind: ImprovementKind,
    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "prioridade")]
    pub priority: ImprovementPriority,
    #[serde(default, alias = "implementada")]
    pub implemented: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "detalhes")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewImprovement {
    #[serde(alias = "tipo")]
    pub kind: ImprovementKind,
    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "prioridade")]
    pub priority: ImprovementPriority,
    #[serde(default, alias = "implementada")]
    pub implemented: bool,
    #[serde(default, alias = "detalhes")]
    pub details: Option<serde_json::Value>,
}

impl Improvement {
    pub fn create(new: NewImprovement, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: new.kind,
            title: new.title,
            description: new.description,
            priority: new.priority,
            implemented: new.implemented,
            timestamp: now,
            details: new.details,
        }
    }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    #[serde(default, alias = "estado")]
    pub state: Option<TaskState>,
    #[serde(default, alias = "agente")]
    pub agent: Option<String>,
    #[serde(default, alias = "prioridade")]
    pub priority: Option<TaskPriority>,
    #[serde(default, alias = "limite")]
    pub limit: Option<usize>,
}

/// Filter tasks, most urgent first, oldest first within a priority.
pub fn query_tasks(tasks: Vec<Task>, filter: &TaskFilter) -> Result<Vec<Task>, OpsError> {
    let limit = resolve_limit(filter.limit)?;
    let mut out: Vec<Task> = tasks
        .into_iter()
        .filter(|t| filter.state.is_none_or(|s| t.state == s))
        .filter(|t| {
            filter
                .agent
                .as_deref()
                .is_none_or(|a| t.assigned_agent.as_deref() == Some(a))
        })
        .filter(|t| filter.priority.is_none_or(|p| t.priority == p))
        .collect();
    out.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    out.truncate(limit);
    Ok(out)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticFilter {
    #[serde(default, alias = "tipo")]
    pub kind: Option<DiagnosticKind>,
    #[serde(default, alias = "severidade")]
    pub severity: Option<Severity>,
    #[serde(default, alias = "limite")]
    pub limit: Option<usize>,
}

/// Filter diagnostics, most severe first, newest first within a severity.
pub fn query_diagnostics(
    diagnostics: Vec<Diagnostic>,
    filter: &DiagnosticFilter,
) -> Result<Vec<Diagnostic>, OpsError> {
    let limit = resolve_limit(filter.limit)?;
    let mut out: Vec<Diagnostic> = diagnostics
        .into_iter()
        .filter(|d| filter.kind.is_none_or(|k| d.kind == k))
        .filter(|d| filter.severity.is_none_or(|s| d.severity == s))
        .collect();
    out.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    out.truncate(limit);
    Ok(out)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorrectionFilter {
    #[serde(default, alias = "aplicada")]
    pub applied: Option<bool>,
    #[serde(default, alias = "diagnostico_id")]
    pub diagnostic_id: Option<String>,
    #[serde(default, alias = "limite")]
    pub limit: Option<usize>,
}

/// Filter corrections, newest first.
pub fn query_corrections(
    corrections: Vec<Correction>,
    filter: &CorrectionFilter,
) -> Result<Vec<Correction>, OpsError> {
    let limit = resolve_limit(filter.limit)?;
    let mut out: Vec<Correction> = corrections
        .into_iter()
        .filter(|c| filter.applied.is_none_or(|a| c.applied == a))
        .filter(|c| {
            filter
                .diagnostic_id
                .as_deref()
                .is_none_or(|id| c.diagnostic_id.as_deref() == Some(id))
        })
        .collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out.truncate(limit);
    Ok(out)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImprovementFilter {
    #[serde(default, alias = "tipo")]
    pub kind: Option<ImprovementKind>,
    #[serde(default, alias = "prioridade")]
    pub priority: Option<ImprovementPriority>,
    #[serde(default, alias = "implementada")]
    pub implemented: Option<bool>,
    #[serde(default, alias = "limite")]
    pub limit: Option<usize>,
}

/// Filter improvements, high priority first, oldest first within a priority.
pub fn query_improvements(
    improvements: Vec<Improvement>,
    filter: &ImprovementFilter,
) -> Result<Vec<Improvement>, OpsError> {
    let limit = resolve_limit(filter.limit)?;
    let mut out: Vec<Improvement> = improvements
        .into_iter()
        .filter(|s| filter.kind.is_none_or(|k| s.kind == k))
        .filter(|s| filter.priority.is_none_or(|p| s.priority == p))
        .filter(|s| filter.implemented.is_none_or(|i| s.implemented == i))
        .collect();
    out.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    out.truncate(limit);
    Ok(out)
}

// ─── Task updates ────────────────────────────────────────────────────────────

const TASK_FIELD_ALIASES: &[(&str, &str)] = &[
    ("titulo", "title"),
    ("descricao", "description"),
    ("estado", "state"),
    ("agente_responsavel", "assigned_agent"),
    ("prioridade", "priority"),
    ("timestamp_criacao", "created_at"),
    ("timestamp_atualizacao", "updated_at"),
    ("resultado", "result"),
    ("contexto", "context"),
];

/// Merge `patch` into the task with `id` and stamp `updated_at`.
///
/// The id cannot be changed. The merged record must still be a valid task.
pub fn patch_task(
    tasks: &mut [Task],
    id: &str,
    patch: serde_json::Map<String, serde_json::Value>,
    now: DateTime<Utc>,
) -> Result<Task, OpsError> {
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| OpsError::TaskNotFound(id.to_string()))?;

    let mut merged = match serde_json::to_value(&*task) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) => return Err(OpsError::InvalidPatch("task is not an object".into())),
        Err(e) => return Err(OpsError::InvalidPatch(e.to_string())),
    };
    for (key, value) in patch {
        let key = TASK_FIELD_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(key);
        if key == "id" {
            continue;
        }
        merged.insert(key, value);
    }

    let mut updated: Task = serde_json::from_value(serde_json::Value::Object(merged))
        .map_err(|e| OpsError::InvalidPatch(e.to_string()))?;
    updated.updated_at = Some(now);
    *task = updated.clone();
    Ok(updated)
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StatusSummary {
    pub tasks: TaskCounts,
    pub diagnostics: DiagnosticCounts,
    pub corrections: DoneCounts,
    pub improvements: DoneCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub by_state: BTreeMap<TaskState, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiagnosticCounts {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
}

/// Totals for records that carry a done flag (`applied` / `implemented`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DoneCounts {
    pub total: usize,
    pub done: usize,
    pub pending: usize,
}

impl DoneCounts {
    fn from_flags(flags: impl Iterator<Item = bool>) -> Self {
        let mut counts = Self::default();
        for flag in flags {
            counts.total += 1;
            if flag {
                counts.done += 1;
            }
        }
        counts.pending = counts.total - counts.done;
        counts
    }
}

pub fn status_summary(
    tasks: &[Task],
    diagnostics: &[Diagnostic],
    corrections: &[Correction],
    improvements: &[Improvement],
) -> StatusSummary {
    let mut by_state = BTreeMap::new();
    for t in tasks {
        *by_state.entry(t.state).or_insert(0) += 1;
    }
    let mut by_severity = BTreeMap::new();
    for d in diagnostics {
        *by_severity.entry(d.severity).or_insert(0) += 1;
    }
    StatusSummary {
        tasks: TaskCounts {
            total: tasks.len(),
            by_state,
        },
        diagnostics: DiagnosticCounts {
            total: diagnostics.len(),
            by_severity,
        },
        corrections: DoneCounts::from_flags(corrections.iter().map(|c| c.applied)),
        improvements: DoneCounts::from_flags(improvements.iter().map(|s| s.implemented)),
    }
}
