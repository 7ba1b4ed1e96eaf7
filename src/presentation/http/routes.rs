//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, require_guide};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(guide_routes(state.clone()))
        .merge(tourist_routes(state))
}

/// Public catalog reads
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/tours", get(handlers::tour::list_published))
        .route("/tours/for-tourists", get(handlers::tour::tours_for_tourists))
        .route("/tours/status/{status}", get(handlers::tour::list_by_status))
        .route("/tours/{id}", get(handlers::tour::get_tour))
        .route("/tours/{id}/keypoints", get(handlers::key_point::list_key_points))
        .route(
            "/tours/{id}/keypoints/first",
            get(handlers::key_point::first_key_point),
        )
        .route(
            "/tours/{id}/travel-times",
            get(handlers::travel_time::list_travel_times),
        )
        .route("/tours/{id}/reviews", get(handlers::review::list_reviews))
}

/// Authoring routes (guide role, author-owned)
fn guide_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/tours/my", get(handlers::tour::my_tours))
        .route("/tours", post(handlers::tour::create_tour))
        .route(
            "/tours/{id}",
            put(handlers::tour::update_tour).delete(handlers::tour::delete_tour),
        )
        .route("/tours/{id}/publish", post(handlers::tour::publish_tour))
        .route("/tours/{id}/archive", post(handlers::tour::archive_tour))
        .route(
            "/tours/{id}/keypoints",
            post(handlers::key_point::create_key_point),
        )
        .route(
            "/tours/{id}/keypoints/{keypoint_id}",
            put(handlers::key_point::update_key_point)
                .delete(handlers::key_point::delete_key_point),
        )
        .route(
            "/tours/{id}/travel-times",
            post(handlers::travel_time::upsert_travel_time),
        )
        .route(
            "/tours/{id}/travel-times/{travel_time_id}",
            axum::routing::delete(handlers::travel_time::delete_travel_time),
        )
        .route_layer(middleware::from_fn(require_guide))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Execution and review routes (any authenticated user)
fn tourist_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/tours/{id}/start", post(handlers::execution::start_tour))
        .route("/tours/{id}/reviews", post(handlers::review::create_review))
        .route("/executions/active", get(handlers::execution::get_active))
        .route(
            "/executions/{id}/location",
            put(handlers::execution::update_location),
        )
        .route(
            "/executions/{id}/keypoints",
            get(handlers::execution::completed_key_points),
        )
        .route(
            "/executions/{id}/keypoints/{keypoint_id}/complete",
            post(handlers::execution::complete_key_point),
        )
        .route(
            "/executions/{id}/complete",
            post(handlers::execution::complete_execution),
        )
        .route(
            "/executions/{id}/abandon",
            post(handlers::execution::abandon_execution),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
