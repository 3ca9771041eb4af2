//! JSON API mounted under `/api`.

pub mod handlers;
pub mod routes;
