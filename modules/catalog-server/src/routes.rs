use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use catalog_store::ProductStore;

use crate::rest;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        // Health check
        .route("/", get(health))
        .route("/health", get(health))
        // Products
        .route(
            "/api/products",
            get(rest::products::api_products).post(rest::products::api_create_product),
        )
        .route("/api/products/{id}", get(rest::products::api_product_detail))
        .route("/api/products/{id}/related", get(rest::related::api_related))
        .route(
            "/api/products/{id}/related/signals",
            get(rest::related::api_related_signals),
        )
        // Search
        .route("/api/search", get(rest::search::api_search))
        .route(
            "/api/search/suggestions",
            get(rest::search::api_search_suggestions),
        )
        .with_state(state)
        .layer(cors)
        // Method + path + status + latency; query strings stay out of the logs
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

async fn health() -> &'static str {
    "ok"
}
