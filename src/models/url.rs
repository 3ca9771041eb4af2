use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted mapping from a long URL to its short ID.
///
/// Records are append-only: neither `long_url` nor `short_id` changes
/// after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub long_url: String,
    pub short_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUrlResponse {
    pub short_id: String,
    pub short_url: String,
    pub long_url: String,
}

/// Body of `POST /`. A missing field is treated the same as an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub long_url: String,
}
