//! Strategic decision and enhanced task query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::{EnhancedTasks, StrategicDecisions};

// ── Strategic decisions ────────────────────────────────────────────────────

const DECISION_COLUMNS: [StrategicDecisions; 7] = [
    StrategicDecisions::Id,
    StrategicDecisions::Title,
    StrategicDecisions::Description,
    StrategicDecisions::Category,
    StrategicDecisions::Impact,
    StrategicDecisions::Status,
    StrategicDecisions::CreatedAt,
];

pub fn insert_decision(
    title: &str,
    description: &str,
    category: &str,
    impact: &str,
    status: &str,
    created_at: &str,
) -> Built {
    Query::insert()
        .into_table(StrategicDecisions::Table)
        .columns([
            StrategicDecisions::Title,
            StrategicDecisions::Description,
            StrategicDecisions::Category,
            StrategicDecisions::Impact,
            StrategicDecisions::Status,
            StrategicDecisions::CreatedAt,
        ])
        .values_panic([
            title.into(),
            description.into(),
            category.into(),
            impact.into(),
            status.into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get_decision(id: i64) -> Built {
    Query::select()
        .columns(DECISION_COLUMNS)
        .from(StrategicDecisions::Table)
        .and_where(Expr::col(StrategicDecisions::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Newest first.
pub fn list_decisions(limit: u32) -> Built {
    Query::select()
        .columns(DECISION_COLUMNS)
        .from(StrategicDecisions::Table)
        .order_by(StrategicDecisions::Id, Order::Desc)
        .limit(u64::from(limit))
        .build(SqliteQueryBuilder)
}

// ── Enhanced tasks ─────────────────────────────────────────────────────────

const TASK_COLUMNS: [EnhancedTasks; 9] = [
    EnhancedTasks::Id,
    EnhancedTasks::Title,
    EnhancedTasks::Description,
    EnhancedTasks::Category,
    EnhancedTasks::Priority,
    EnhancedTasks::Status,
    EnhancedTasks::DueDate,
    EnhancedTasks::AssignedAgent,
    EnhancedTasks::CreatedAt,
];

pub struct TaskParams<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
    pub due_date: Option<&'a str>,
    pub assigned_agent: Option<&'a str>,
    pub created_at: &'a str,
}

pub fn insert_task(p: &TaskParams<'_>) -> Built {
    Query::insert()
        .into_table(EnhancedTasks::Table)
        .columns([
            EnhancedTasks::Title,
            EnhancedTasks::Description,
            EnhancedTasks::Category,
            EnhancedTasks::Priority,
            EnhancedTasks::Status,
            EnhancedTasks::DueDate,
            EnhancedTasks::AssignedAgent,
            EnhancedTasks::CreatedAt,
        ])
        .values_panic([
            p.title.into(),
            p.description.into(),
            p.category.into(),
            p.priority.into(),
            p.status.into(),
            p.due_date.map(str::to_string).into(),
            p.assigned_agent.map(str::to_string).into(),
            p.created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get_task(id: i64) -> Built {
    Query::select()
        .columns(TASK_COLUMNS)
        .from(EnhancedTasks::Table)
        .and_where(Expr::col(EnhancedTasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Newest first.
pub fn list_tasks(limit: u32) -> Built {
    Query::select()
        .columns(TASK_COLUMNS)
        .from(EnhancedTasks::Table)
        .order_by(EnhancedTasks::Id, Order::Desc)
        .limit(u64::from(limit))
        .build(SqliteQueryBuilder)
}

/// Titles of tasks whose status is one of `statuses`, oldest first.
pub fn open_task_titles(statuses: &[&str]) -> Built {
    Query::select()
        .column(EnhancedTasks::Title)
        .from(EnhancedTasks::Table)
        .and_where(Expr::col(EnhancedTasks::Status).is_in(statuses.iter().copied()))
        .order_by(EnhancedTasks::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}
