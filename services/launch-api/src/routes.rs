use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// API routes are versioned under `/v1`; `/health` sits at the root.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/launches",
            get(handlers::list_launches).post(handlers::add_new_launch),
        )
        .route("/launches/:id", delete(handlers::abort_launch))
        .route("/launches/:id/abort", post(handlers::abort_launch))
        .route("/planets", get(handlers::list_planets));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api)
        .with_state(state)
}
