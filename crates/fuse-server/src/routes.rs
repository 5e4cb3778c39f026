//! Route definitions for the gateway API.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        // Apply middleware
        .layer(TraceLayer::new_for_http())
        // The front end is hosted elsewhere; every response allows any origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Gateway API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/completions", post(handlers::completions))
        .route("/quotes", get(handlers::quotes))
        .route("/sentiment", get(handlers::sentiment))
        .route("/regime", get(handlers::macro_regime))
        .route("/research", get(handlers::research))
}
