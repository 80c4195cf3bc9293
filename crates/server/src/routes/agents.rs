use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use jarvis_api::{
    CommunicationGuide, CycleResult, OPEN_STATUSES, OrchestratorStatus, TopicQuery, db,
};
use jarvis_core::agents::{CycleInput, HeadlineSnapshot, OfferSnapshot, communication_guide};
use jarvis_core::news::{NewsCategory, Sentiment};

use crate::AppState;
use crate::error::ApiErr;
use crate::storage::{Db, credit_from_row, news_from_row, sq_query_map};

const CYCLE_HEADLINES: u32 = 20;

/// GET /api/agents/communication?topic=
pub async fn communication(Query(q): Query<TopicQuery>) -> Json<CommunicationGuide> {
    let topic = q
        .topic
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "index".to_string());
    let content = communication_guide(&topic).to_string();
    Json(CommunicationGuide { topic, content })
}

/// GET /api/system-orchestrator/status
pub async fn orchestrator_status(State(state): State<AppState>) -> Json<OrchestratorStatus> {
    Json(state.orchestrator.lock().await.status())
}

/// POST /api/system-orchestrator/execute-cycle
pub async fn execute_cycle(State(state): State<AppState>) -> Result<Json<CycleResult>, ApiErr> {
    let input = cycle_input(&state.db)?;
    let result = state.orchestrator.lock().await.run_cycle(&input, Utc::now());
    Ok(Json(result))
}

fn cycle_input(db: &Db) -> Result<CycleInput, ApiErr> {
    let conn = db.conn();
    let offers = sq_query_map(&conn, db::dashboard::list_credit(), credit_from_row)
        .map_err(ApiErr::from_db("load credit offers"))?
        .into_iter()
        .map(|c| OfferSnapshot {
            title: c.title,
            provider: c.provider,
            interest_rate: c.interest_rate,
            max_amount: c.max_amount,
        })
        .collect();
    let headlines = sq_query_map(&conn, db::news::list(None, CYCLE_HEADLINES), news_from_row)
        .map_err(ApiErr::from_db("load headlines"))?
        .into_iter()
        .filter_map(|a| {
            Some(HeadlineSnapshot {
                category: NewsCategory::parse(&a.category)?,
                sentiment: Sentiment::parse(&a.sentiment),
                relevance: u8::try_from(a.relevance.clamp(0, 100)).unwrap_or_default(),
                title: a.title,
            })
        })
        .collect();
    let pending_tasks = sq_query_map(&conn, db::planning::open_task_titles(OPEN_STATUSES), |row| {
        row.get::<_, String>(0)
    })
    .map_err(ApiErr::from_db("load open tasks"))?;

    Ok(CycleInput {
        offers,
        headlines,
        pending_tasks,
    })
}
