use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/filters", get(handlers::get_filters))
        .route(
            "/api/winners",
            get(handlers::get_winners).delete(handlers::clear_winners),
        )
        .route("/api/health", get(handlers::health))
        .with_state(state)
}
