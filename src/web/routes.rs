use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, index, redirect_url, shorten_form, AppState};
use crate::api::routes::create_api_router;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_router = create_api_router(Arc::clone(&state));

    Router::new()
        .route("/", get(index).post(shorten_form))
        .route("/health", get(health_check))
        .route("/{short_id}", get(redirect_url))
        .with_state(state)
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
}
