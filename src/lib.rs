pub mod api;
pub mod config;
pub mod models;
pub mod shortener;
pub mod storage;
pub mod web;

use std::sync::Arc;

use crate::config::Config;
use crate::shortener::Shortener;
use crate::storage::Storage;
use crate::web::AppState;

/// Wire the shortener and web state for `config` on top of `storage`.
pub fn build_state(config: &Config, storage: Arc<dyn Storage>) -> Arc<AppState> {
    Arc::new(AppState {
        shortener: Shortener::new(
            storage,
            config.short_id.length,
            config.short_id.max_attempts,
        ),
        base_url: config.base_url.clone(),
        redirect_status: config.redirect_status,
    })
}
