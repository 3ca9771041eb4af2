//! Short ID allocation and resolution.

pub mod error;
pub mod generator;
pub mod service;

pub use error::ShortenerError;
pub use generator::{IdGenerator, RandomIdGenerator, ALPHABET};
pub use service::{short_url, Shortened, Shortener, DEFAULT_MAX_ATTEMPTS};
