//! Admin dashboard handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::DashboardStats;
use crate::services::RatingService;
use crate::state::AppState;

/// `GET /dashboard/stats` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
    pub avg_rating: f64,
}

impl From<DashboardStats> for StatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_users: stats.total_users,
            total_stores: stats.total_stores,
            total_ratings: stats.total_ratings,
            avg_rating: stats.avg_rating,
        }
    }
}

/// `GET /dashboard/stats`
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<StatsResponse>> {
    let stats = RatingService::new(state.pool()).dashboard_stats().await?;
    Ok(Json(stats.into()))
}
