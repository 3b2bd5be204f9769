//! HTTP API server for the bakery CRUD service.
//!
//! Exposes read and write endpoints for bakeries and their baked goods,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::BakeryStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: BakeryStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/", get(routes::root::index))
        .route("/health", get(routes::health::check))
        .route("/bakeries", get(routes::bakeries::list::<S>))
        .route(
            "/bakeries/{id}",
            get(routes::bakeries::get::<S>).patch(routes::bakeries::rename::<S>),
        )
        .route(
            "/baked_goods/by_price",
            get(routes::baked_goods::by_price::<S>),
        )
        .route(
            "/baked_goods/most_expensive",
            get(routes::baked_goods::most_expensive::<S>),
        )
        .route("/baked_goods", post(routes::baked_goods::create::<S>))
        .route(
            "/baked_goods/{id}",
            delete(routes::baked_goods::remove::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
