use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers;

/// Creates the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/algorithms", get(handlers::list_algorithms))
        .route("/recommend", get(handlers::recommend))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
