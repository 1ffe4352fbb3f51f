//! Store catalog handlers, including the store-owner dashboard.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use storerate_core::StoreId;

use super::MessageResponse;
use super::ratings::{RatingResponse, SummaryResponse};
use crate::error::{ApiJson, ApiPath, ApiQuery, Result};
use crate::middleware::{RequireAdmin, RequireAuth, RequireStoreOwner};
use crate::models::{RatedStore, Store, StoreFilter};
use crate::services::{CatalogService, StoreInput};
use crate::state::AppState;

/// Admin "add store" request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddStoreRequest {
    pub name: String,
    pub purpose: String,
    pub address: String,
    pub email: String,
    pub password: String,
}

/// Query filters for `GET /stores`.
#[derive(Debug, Default, Deserialize)]
pub struct StoreListQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub purpose: Option<String>,
    /// Matches name or address.
    pub q: Option<String>,
}

impl From<StoreListQuery> for StoreFilter {
    fn from(query: StoreListQuery) -> Self {
        Self {
            name: query.name,
            email: query.email,
            address: query.address,
            purpose: query.purpose,
            q: query.q,
        }
    }
}

/// Store fields as shown to clients.
#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub id: StoreId,
    pub name: String,
    pub purpose: String,
    pub address: String,
    pub email: String,
}

impl From<Store> for StoreResponse {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            name: store.name,
            purpose: store.purpose,
            address: store.address,
            email: store.email.into_inner(),
        }
    }
}

/// A store list entry with its rating aggregate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedStoreResponse {
    #[serde(flatten)]
    pub store: StoreResponse,
    pub avg_rating: f64,
    pub ratings_count: i64,
}

impl From<RatedStore> for RatedStoreResponse {
    fn from(rated: RatedStore) -> Self {
        Self {
            store: rated.store.into(),
            avg_rating: rated.aggregate.average,
            ratings_count: rated.aggregate.count,
        }
    }
}

/// `GET /owner/store` response body.
#[derive(Debug, Serialize)]
pub struct OwnerStoreResponse {
    pub store: StoreResponse,
    pub summary: SummaryResponse,
    pub ratings: Vec<RatingResponse>,
}

/// `POST /stores`
pub async fn add_store(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiJson(body): ApiJson<AddStoreRequest>,
) -> Result<Json<MessageResponse>> {
    CatalogService::new(state.pool())
        .add_store(StoreInput {
            name: &body.name,
            purpose: &body.purpose,
            address: &body.address,
            email: &body.email,
            password: &body.password,
        })
        .await?;

    Ok(MessageResponse::json("Store added successfully!"))
}

/// `GET /stores`
pub async fn list_stores(
    State(state): State<AppState>,
    RequireAuth(_account): RequireAuth,
    ApiQuery(query): ApiQuery<StoreListQuery>,
) -> Result<Json<Vec<RatedStoreResponse>>> {
    let stores = CatalogService::new(state.pool())
        .list(&StoreFilter::from(query))
        .await?;

    Ok(Json(stores.into_iter().map(RatedStoreResponse::from).collect()))
}

/// `DELETE /stores/{id}`
///
/// Also removes the store's owner account and ratings.
pub async fn delete_store(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>> {
    CatalogService::new(state.pool())
        .delete(StoreId::new(id))
        .await?;

    Ok(MessageResponse::json("Store deleted successfully"))
}

/// `GET /owner/store`
pub async fn owner_store(
    State(state): State<AppState>,
    RequireStoreOwner(owner): RequireStoreOwner,
) -> Result<Json<OwnerStoreResponse>> {
    let dashboard = CatalogService::new(state.pool())
        .owner_dashboard(&owner.email)
        .await?;

    Ok(Json(OwnerStoreResponse {
        store: dashboard.store.into(),
        summary: dashboard.summary.into(),
        ratings: dashboard
            .ratings
            .into_iter()
            .map(RatingResponse::from)
            .collect(),
    }))
}
