pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;
use crate::ui;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser form
        .route("/", get(ui::handle_form))
        .route("/generate", post(ui::handle_generate))
        // JSON API
        .route("/api/v1/documents", post(handlers::handle_create_document))
        .route("/api/v1/styles", get(handlers::handle_list_styles))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
