use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::ListStore,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::providers::RecommendationProvider,
};

pub mod curated_lists;
pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub store: Arc<dyn ListStore>,
    pub provider: Arc<dyn RecommendationProvider>,
    /// Owner of the curated lists, as resolved at startup
    pub curator_owner_id: i32,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/curated-lists", get(curated_lists::list_all))
        .route("/curated-lists/:list_id", get(curated_lists::get_one))
        .route("/movies/:movie_id/similar", get(recommendations::similar))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
