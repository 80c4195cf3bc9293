use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use jarvis_api::{NewsArticle, NewsQuery, db};
use jarvis_core::news::NewsCategory;

use crate::AppState;
use crate::error::ApiErr;
use crate::storage::{news_from_row, sq_query_map, upsert_article};

/// GET /api/news: stored headlines, newest first.
///
/// `refresh=true` pulls from NewsAPI first when a key is configured; a failed
/// refresh is logged and the stored rows are returned anyway.
pub async fn list_news(
    State(state): State<AppState>,
    Query(q): Query<NewsQuery>,
) -> Result<Json<Vec<NewsArticle>>, ApiErr> {
    let category = match q.category.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            NewsCategory::parse(raw)
                .ok_or_else(|| ApiErr::bad_request(format!("unknown news category: {raw}")))?,
        ),
    };

    if q.refresh.unwrap_or(false) {
        refresh(&state).await;
    }

    let limit = q.limit.unwrap_or(50).clamp(1, 200);
    let conn = state.db.conn();
    sq_query_map(
        &conn,
        db::news::list(category.as_ref().map(NewsCategory::as_str), limit),
        news_from_row,
    )
    .map(Json)
    .map_err(ApiErr::from_db("list news"))
}

async fn refresh(state: &AppState) {
    let Some(client) = &state.services.news else {
        tracing::debug!("news refresh requested but no NewsAPI key configured");
        return;
    };
    let articles = match client
        .search(&state.config.news_query, state.config.news_page_size)
        .await
    {
        Ok(articles) => articles,
        Err(e) => {
            tracing::warn!(status = ?e.status(), "news refresh failed: {e}");
            return;
        }
    };

    let now = Utc::now();
    let conn = state.db.conn();
    let mut stored = 0usize;
    for article in &articles {
        match upsert_article(&conn, article, now) {
            Ok(true) => stored += 1,
            Ok(false) => {}
            Err(e) => tracing::error!(url = %article.url, "store article: {e}"),
        }
    }
    tracing::info!(fetched = articles.len(), stored, "news refreshed");
}
