mod deal;
pub mod error;

use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Json, Router};
use dealink_catalog::CatalogClient;
use dealink_core::AppConfig;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: CatalogClient,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

pub fn build_app(state: AppState) -> Router {
    let catalog_url = state.catalog.catalog_url().to_owned();

    Router::new()
        .route("/health", get(health))
        .route("/deal", get(deal::deal_by_query))
        .route("/deal/{*key}", get(deal::deal_by_path))
        .route("/d", get(deal::deal_by_query))
        .route("/d/{*key}", get(deal::deal_by_path))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_id))
                .layer(CatchPanicLayer::custom(error::panic_handler(catalog_url))),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}
