//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Detection and selection log
        .route(
            "/detect",
            get(handlers::query_logs)
                .post(handlers::detect)
                .delete(handlers::clear_logs),
        )
        .route("/frequencies", get(handlers::list_frequencies));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.server.max_body_size))
        .layer(TraceLayer::new_for_http());

    if state.server.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}
