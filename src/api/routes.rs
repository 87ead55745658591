//! API route definitions

use super::handlers::{self, ChartsState};
use crate::auth::require_auth;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: ChartsState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/api/charts", get(handlers::charts_view))
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        .merge(protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
