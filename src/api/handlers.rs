use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::models::{CreateUrlRequest, CreateUrlResponse, UrlRecord};
use crate::shortener::{short_url, ShortenerError};
use crate::web::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: ShortenerError) -> ApiError {
    let status = match err {
        ShortenerError::Validation => StatusCode::BAD_REQUEST,
        ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
        ShortenerError::AllocationExhausted { .. } | ShortenerError::Storage(_) => {
            tracing::error!(error = %err, "api request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let error = match err {
        ShortenerError::Storage(_) => "Internal storage error".to_string(),
        other => other.to_string(),
    };

    (status, Json(ErrorResponse { error }))
}

/// Create (or return the existing) short URL for a long URL
pub async fn create_url(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), ApiError> {
    let shortened = state
        .shortener
        .shorten(&payload.url)
        .await
        .map_err(api_error)?;

    let status = if shortened.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let record = shortened.record;

    Ok((
        status,
        Json(CreateUrlResponse {
            short_url: short_url(&state.base_url, &record.short_id),
            short_id: record.short_id,
            long_url: record.long_url,
        }),
    ))
}

/// Get a URL record by short ID
pub async fn get_url(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
) -> Result<Json<UrlRecord>, ApiError> {
    match state.shortener.storage().find_by_short_id(&short_id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(api_error(ShortenerError::NotFound(short_id))),
        Err(e) => Err(api_error(ShortenerError::Storage(e))),
    }
}
