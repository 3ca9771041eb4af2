use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers::{create_url, get_url};
use crate::web::AppState;

pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/urls", post(create_url))
        .route("/urls/{short_id}", get(get_url))
        .with_state(state)
}
