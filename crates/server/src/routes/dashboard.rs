use axum::{Json, extract::State};
use chrono::Utc;

use jarvis_api::{AiTrend, BusinessStats, BusinessSuggestion, CreditOpportunity, MetaAd, db};
use jarvis_core::mock;

use crate::error::ApiErr;
use crate::storage::{
    Db, ad_from_row, credit_from_row, sq_query_map, sq_query_row, stats_from_row,
    suggestion_from_row,
};

/// GET /api/stats: latest business stats snapshot.
pub async fn stats(State(db): State<Db>) -> Result<Json<BusinessStats>, ApiErr> {
    let conn = db.conn();
    match sq_query_row(&conn, db::dashboard::latest_stats(), stats_from_row) {
        Ok(stats) => Ok(Json(stats)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(ApiErr::not_found("no stats recorded")),
        Err(e) => Err(ApiErr::from_db("latest stats")(e)),
    }
}

/// GET /api/credit-opportunities: closest deadline first.
pub async fn credit_opportunities(
    State(db): State<Db>,
) -> Result<Json<Vec<CreditOpportunity>>, ApiErr> {
    let conn = db.conn();
    sq_query_map(&conn, db::dashboard::list_credit(), credit_from_row)
        .map(Json)
        .map_err(ApiErr::from_db("list credit opportunities"))
}

/// GET /api/meta-ads
pub async fn meta_ads(State(db): State<Db>) -> Result<Json<Vec<MetaAd>>, ApiErr> {
    let conn = db.conn();
    sq_query_map(&conn, db::dashboard::list_ads(), ad_from_row)
        .map(Json)
        .map_err(ApiErr::from_db("list meta ads"))
}

/// GET /api/suggestions: high priority first.
pub async fn suggestions(State(db): State<Db>) -> Result<Json<Vec<BusinessSuggestion>>, ApiErr> {
    let conn = db.conn();
    sq_query_map(&conn, db::dashboard::list_suggestions(), suggestion_from_row)
        .map(Json)
        .map_err(ApiErr::from_db("list suggestions"))
}

/// GET /api/ai-trends
pub async fn ai_trends() -> Json<Vec<AiTrend>> {
    Json(mock::ai_trends(Utc::now()))
}
