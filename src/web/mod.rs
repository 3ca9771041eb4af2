//! Browser-facing routes: the shortening form and short ID redirects.

pub mod handlers;
pub mod routes;
pub mod views;

pub use handlers::AppState;
pub use routes::create_router;
