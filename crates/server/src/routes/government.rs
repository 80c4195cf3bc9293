use axum::{Json, extract::State};
use chrono::Utc;

use jarvis_api::{GovernmentBid, GovernmentOfficial};
use jarvis_core::mock;

use crate::Services;

/// GET /api/government/bids: transparency portal, or mock data when the
/// portal is not configured or fails.
pub async fn bids(State(services): State<Services>) -> Json<Vec<GovernmentBid>> {
    let today = Utc::now().date_naive();
    if let Some(client) = &services.government {
        match client.bids(today).await {
            Ok(bids) => return Json(bids),
            Err(e) => tracing::warn!(status = ?e.status(), "government bids unavailable, using mock: {e}"),
        }
    }
    Json(mock::government_bids(today))
}

/// GET /api/government/officials
pub async fn officials(State(services): State<Services>) -> Json<Vec<GovernmentOfficial>> {
    if let Some(client) = &services.government {
        match client.officials().await {
            Ok(officials) => return Json(officials),
            Err(e) => {
                tracing::warn!(status = ?e.status(), "government officials unavailable, using mock: {e}")
            }
        }
    }
    Json(mock::government_officials())
}
