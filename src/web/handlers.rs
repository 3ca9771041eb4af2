use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::views::{ErrorPage, IndexPage, NotFoundPage};
use crate::config::RedirectMode;
use crate::models::ShortenForm;
use crate::shortener::{short_url, Shortener, ShortenerError};

pub struct AppState {
    pub shortener: Shortener,
    /// Prepended to short IDs for display
    pub base_url: String,
    pub redirect_status: RedirectMode,
}

/// Show the shortening form
pub async fn index() -> Response {
    (StatusCode::OK, IndexPage::default()).into_response()
}

/// Shorten the submitted URL and show the result
pub async fn shorten_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ShortenForm>,
) -> Response {
    match state.shortener.shorten(&form.long_url).await {
        Ok(shortened) => (
            StatusCode::OK,
            IndexPage {
                error: None,
                short_url: Some(short_url(&state.base_url, &shortened.record.short_id)),
            },
        )
            .into_response(),
        Err(ShortenerError::Validation) => (
            StatusCode::BAD_REQUEST,
            IndexPage {
                error: Some("URL cannot be empty!".to_string()),
                short_url: None,
            },
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to shorten url");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorPage {
                    message: "Could not shorten this URL right now. Please try again.".to_string(),
                },
            )
                .into_response()
        }
    }
}

/// Redirect to the long URL behind `short_id`
pub async fn redirect_url(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
) -> Response {
    match state.shortener.resolve(&short_id).await {
        Ok(long_url) => match HeaderValue::try_from(long_url) {
            Ok(location) => (
                state.redirect_status.status_code(),
                [(header::LOCATION, location)],
            )
                .into_response(),
            Err(err) => {
                tracing::error!(short_id = %short_id, error = %err, "stored url is not a valid location header");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        },
        Err(ShortenerError::NotFound(short_id)) => {
            (StatusCode::NOT_FOUND, NotFoundPage { short_id }).into_response()
        }
        Err(err) => {
            tracing::error!(short_id = %short_id, error = %err, "failed to resolve short id");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorPage {
                    message: "Could not look up this link right now.".to_string(),
                },
            )
                .into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
    }

    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
