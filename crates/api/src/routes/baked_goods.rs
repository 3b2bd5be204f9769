//! Baked good query, create, and delete endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Form, Json};
use common::{BakedGoodId, BakeryId};
use serde::{Deserialize, Serialize};
use store::{BakedGood, BakeryStore, NewBakedGood};

use crate::error::ApiError;

use super::AppState;

const REQUIRED_FIELDS: &str = "name, price, and bakery_id are required";

// -- Request types --

/// Form schema for POST /baked_goods. Every field arrives as an optional
/// string so presence is checked before any parsing or store access.
#[derive(Deserialize)]
pub struct CreateBakedGoodRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub bakery_id: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct BakedGoodResponse {
    pub id: BakedGoodId,
    pub name: String,
    pub price: f64,
    pub bakery_id: BakeryId,
    pub created_at: String,
}

impl From<BakedGood> for BakedGoodResponse {
    fn from(good: BakedGood) -> Self {
        Self {
            id: good.id,
            name: good.name,
            price: good.price,
            bakery_id: good.bakery_id,
            created_at: good.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// -- Handlers --

/// GET /baked_goods/by_price — all baked goods, price descending.
#[tracing::instrument(skip(state))]
pub async fn by_price<S: BakeryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<BakedGoodResponse>>, ApiError> {
    let goods = state.store.baked_goods_by_price().await?;

    let responses: Vec<BakedGoodResponse> =
        goods.into_iter().map(BakedGoodResponse::from).collect();

    Ok(Json(responses))
}

/// GET /baked_goods/most_expensive — the highest-priced baked good.
#[tracing::instrument(skip(state))]
pub async fn most_expensive<S: BakeryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<BakedGoodResponse>, ApiError> {
    let good = state
        .store
        .most_expensive_baked_good()
        .await?
        .ok_or_else(|| ApiError::NotFound("No baked goods found".to_string()))?;

    Ok(Json(good.into()))
}

/// POST /baked_goods — create a baked good from form data.
///
/// `name`, `price`, and `bakery_id` are all required. The bakery id is not
/// checked for existence here; the PostgreSQL schema rejects dangling
/// references, the in-memory store stores them as given.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: BakeryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Form(req): Form<CreateBakedGoodRequest>,
) -> Result<(StatusCode, Json<BakedGoodResponse>), ApiError> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let bakery_id = req.bakery_id.as_deref().filter(|id| !id.is_empty());

    let (Some(name), Some(price), Some(bakery_id)) = (name, req.price.as_deref(), bakery_id)
    else {
        return Err(ApiError::BadRequest(REQUIRED_FIELDS.to_string()));
    };

    let price: f64 = price
        .trim()
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid price: {e}")))?;
    let bakery_id: i64 = bakery_id
        .trim()
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid bakery_id: {e}")))?;

    let good = state
        .store
        .insert_baked_good(NewBakedGood::new(name, price, BakeryId::new(bakery_id)))
        .await?;

    metrics::counter!("baked_goods_created").increment(1);
    tracing::info!(id = %good.id, bakery_id = %good.bakery_id, "baked good created");

    Ok((StatusCode::CREATED, Json(good.into())))
}

/// DELETE /baked_goods/:id — delete one baked good.
#[tracing::instrument(skip(state))]
pub async fn remove<S: BakeryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BakedGoodId>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.delete_baked_good(id).await? {
        return Err(ApiError::NotFound("BakedGood not found".to_string()));
    }

    metrics::counter!("baked_goods_deleted").increment(1);
    tracing::info!(%id, "baked good deleted");

    Ok(Json(MessageResponse {
        message: format!("BakedGood {id} deleted"),
    }))
}
