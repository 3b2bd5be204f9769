//! Bakery read and rename endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Form, Json};
use common::BakeryId;
use serde::{Deserialize, Serialize};
use store::{BakedGood, Bakery, BakeryStore};

use crate::error::ApiError;

use super::AppState;
use super::baked_goods::BakedGoodResponse;

// -- Request types --

#[derive(Deserialize)]
pub struct RenameBakeryRequest {
    pub name: Option<String>,
}

// -- Response types --

/// A bakery with its baked goods embedded one level deep. The goods carry
/// no back-reference to the bakery, so the mapping never cycles.
#[derive(Serialize)]
pub struct BakeryResponse {
    pub id: BakeryId,
    pub name: String,
    pub created_at: String,
    pub baked_goods: Vec<BakedGoodResponse>,
}

impl BakeryResponse {
    fn new(bakery: Bakery, goods: Vec<BakedGood>) -> Self {
        Self {
            id: bakery.id,
            name: bakery.name,
            created_at: bakery.created_at.to_rfc3339(),
            baked_goods: goods.into_iter().map(BakedGoodResponse::from).collect(),
        }
    }
}

// -- Handlers --

/// GET /bakeries — list all bakeries with their baked goods, in id order.
#[tracing::instrument(skip(state))]
pub async fn list<S: BakeryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<BakeryResponse>>, ApiError> {
    let bakeries = state.store.list_bakeries().await?;

    let mut goods_by_bakery: HashMap<BakeryId, Vec<BakedGood>> = HashMap::new();
    for good in state.store.list_baked_goods().await? {
        goods_by_bakery
            .entry(good.bakery_id)
            .or_default()
            .push(good);
    }

    let responses: Vec<BakeryResponse> = bakeries
        .into_iter()
        .map(|bakery| {
            let goods = goods_by_bakery.remove(&bakery.id).unwrap_or_default();
            BakeryResponse::new(bakery, goods)
        })
        .collect();

    Ok(Json(responses))
}

/// GET /bakeries/:id — load one bakery with its baked goods.
#[tracing::instrument(skip(state))]
pub async fn get<S: BakeryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BakeryId>,
) -> Result<Json<BakeryResponse>, ApiError> {
    let bakery = state
        .store
        .get_bakery(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bakery not found".to_string()))?;

    let goods = state.store.baked_goods_for_bakery(id).await?;

    Ok(Json(BakeryResponse::new(bakery, goods)))
}

/// PATCH /bakeries/:id — update the bakery's name from form input.
///
/// The `name` field is optional; a missing or blank value leaves the stored
/// name unchanged, a present value is trimmed before it is stored.
#[tracing::instrument(skip(state, req))]
pub async fn rename<S: BakeryStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BakeryId>,
    Form(req): Form<RenameBakeryRequest>,
) -> Result<Json<BakeryResponse>, ApiError> {
    let new_name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let bakery = match new_name {
        Some(name) => {
            let renamed = state.store.rename_bakery(id, name).await?;
            if renamed.is_some() {
                metrics::counter!("bakeries_renamed").increment(1);
                tracing::info!(%id, "bakery renamed");
            }
            renamed
        }
        None => state.store.get_bakery(id).await?,
    }
    .ok_or_else(|| ApiError::NotFound("Bakery not found".to_string()))?;

    let goods = state.store.baked_goods_for_bakery(id).await?;

    Ok(Json(BakeryResponse::new(bakery, goods)))
}
