//! Route handlers and router assembly

pub mod analyze;
pub mod helpers;
pub mod insight;
pub mod screenshot;
pub mod sweep;
pub mod targets;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::types::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Assemble the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze::analyze))
        .route("/cron-sweep", post(sweep::cron_sweep))
        .route("/insight", post(insight::insight))
        .route("/screenshot", post(screenshot::screenshot))
        .route(
            "/targets",
            get(targets::list_targets).post(targets::create_target),
        )
        .route("/targets/{id}", delete(targets::delete_target))
        .route("/targets/{id}/analyses", get(targets::list_analyses))
        .route("/analyses/{id}", delete(targets::delete_analysis))
        .route("/quick-tests", get(targets::list_quick_tests))
        .route("/quick-tests/{id}", delete(targets::delete_quick_test))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
