//! Rating handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use storerate_core::{Score, StoreId};

use crate::error::{ApiJson, ApiPath, ApiQuery, AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth, RequireUser};
use crate::models::{Rating, RatingFilter, RatingSummary, RatingWithStore};
use crate::services::{RatingService, RatingSubmission};
use crate::state::AppState;

/// Rating submission body.
///
/// `user_email` is optional; the caller's session decides who is rating.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRatingRequest {
    pub user_email: Option<String>,
    pub store_id: Option<i32>,
    pub score: Option<i64>,
}

/// Query filters for `GET /ratings`.
#[derive(Debug, Default, Deserialize)]
pub struct RatingListQuery {
    pub user_email: Option<String>,
    pub store_name: Option<String>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
}

impl TryFrom<RatingListQuery> for RatingFilter {
    type Error = AppError;

    fn try_from(query: RatingListQuery) -> std::result::Result<Self, Self::Error> {
        let bound = |v: Option<i64>| {
            v.map(Score::new)
                .transpose()
                .map_err(|e| AppError::BadRequest(e.to_string()))
        };

        Ok(Self {
            user_email: query.user_email,
            store_name: query.store_name,
            min_score: bound(query.min_score)?,
            max_score: bound(query.max_score)?,
        })
    }
}

/// `POST /ratings` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingResponse {
    pub message: &'static str,
    pub avg_rating: f64,
    pub ratings_count: i64,
}

/// One rating of a store.
#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub user_email: String,
    pub score: Score,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            user_email: rating.user_email.into_inner(),
            score: rating.score,
        }
    }
}

/// One rating in the admin listing.
#[derive(Debug, Serialize)]
pub struct AdminRatingResponse {
    pub user_email: String,
    pub store_id: StoreId,
    pub store_name: String,
    pub score: Score,
}

impl From<RatingWithStore> for AdminRatingResponse {
    fn from(rating: RatingWithStore) -> Self {
        Self {
            user_email: rating.user_email.into_inner(),
            store_id: rating.store_id,
            store_name: rating.store_name,
            score: rating.score,
        }
    }
}

/// Aggregate plus star distribution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub store_id: StoreId,
    pub avg_rating: f64,
    pub ratings_count: i64,
    pub distribution: [i64; 5],
}

impl From<RatingSummary> for SummaryResponse {
    fn from(summary: RatingSummary) -> Self {
        Self {
            store_id: summary.store_id,
            avg_rating: summary.aggregate.average,
            ratings_count: summary.aggregate.count,
            distribution: summary.distribution,
        }
    }
}

/// `POST /ratings`
pub async fn submit_rating(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiJson(body): ApiJson<SubmitRatingRequest>,
) -> Result<Json<SubmitRatingResponse>> {
    let aggregate = RatingService::new(state.pool())
        .submit(
            &user,
            RatingSubmission {
                user_email: body.user_email.as_deref(),
                store_id: body.store_id,
                score: body.score,
            },
        )
        .await?;

    Ok(Json(SubmitRatingResponse {
        message: "Rating submitted!",
        avg_rating: aggregate.average,
        ratings_count: aggregate.count,
    }))
}

/// `GET /ratings/{store_id}`
pub async fn store_ratings(
    State(state): State<AppState>,
    RequireAuth(_account): RequireAuth,
    ApiPath(store_id): ApiPath<i32>,
) -> Result<Json<Vec<RatingResponse>>> {
    let ratings = RatingService::new(state.pool())
        .for_store(StoreId::new(store_id))
        .await?;

    Ok(Json(ratings.into_iter().map(RatingResponse::from).collect()))
}

/// `GET /ratings/{store_id}/summary`
pub async fn store_summary(
    State(state): State<AppState>,
    RequireAuth(_account): RequireAuth,
    ApiPath(store_id): ApiPath<i32>,
) -> Result<Json<SummaryResponse>> {
    let summary = RatingService::new(state.pool())
        .summary(StoreId::new(store_id))
        .await?;

    Ok(Json(summary.into()))
}

/// `GET /ratings`
pub async fn list_ratings(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<RatingListQuery>,
) -> Result<Json<Vec<AdminRatingResponse>>> {
    let filter = RatingFilter::try_from(query)?;
    let ratings = RatingService::new(state.pool()).list_all(&filter).await?;

    Ok(Json(
        ratings.into_iter().map(AdminRatingResponse::from).collect(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json_shape() {
        let summary = RatingSummary::from_distribution(
            StoreId::new(2),
            [(Score::new(4).unwrap(), 1), (Score::new(2).unwrap(), 1)],
        );
        let json = serde_json::to_value(SummaryResponse::from(summary)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "storeId": 2,
                "avgRating": 3.0,
                "ratingsCount": 2,
                "distribution": [0, 1, 0, 1, 0],
            })
        );
    }

    #[test]
    fn test_submit_response_uses_camel_case() {
        let json = serde_json::to_value(SubmitRatingResponse {
            message: "Rating submitted!",
            avg_rating: 5.0,
            ratings_count: 1,
        })
        .unwrap();
        assert_eq!(json["avgRating"], 5.0);
        assert_eq!(json["ratingsCount"], 1);
    }

    #[test]
    fn test_score_bounds_are_validated() {
        let err = RatingFilter::try_from(RatingListQuery {
            min_score: Some(0),
            ..RatingListQuery::default()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let filter = RatingFilter::try_from(RatingListQuery {
            min_score: Some(2),
            max_score: Some(4),
            ..RatingListQuery::default()
        })
        .unwrap();
        assert_eq!(filter.min_score.map(Score::get), Some(2));
        assert_eq!(filter.max_score.map(Score::get), Some(4));
    }
}
