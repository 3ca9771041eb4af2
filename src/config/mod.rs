use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "snip";
const ENV_PREFIX: &str = "SNIP";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Prepended to a short ID to build the full short URL
    pub base_url: String,
    pub short_id: ShortIdConfig,
    pub redirect_status: RedirectMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortIdConfig {
    pub length: usize,
    /// Collision retries before giving up with `AllocationExhausted`
    pub max_attempts: u32,
}

/// HTTP status used when redirecting a short ID
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectMode {
    #[default]
    Found,
    Temporary,
    Permanent,
    MovedPermanently,
}

impl RedirectMode {
    pub fn status_code(self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            RedirectMode::Found => StatusCode::FOUND,
            RedirectMode::Temporary => StatusCode::TEMPORARY_REDIRECT,
            RedirectMode::Permanent => StatusCode::PERMANENT_REDIRECT,
            RedirectMode::MovedPermanently => StatusCode::MOVED_PERMANENTLY,
        }
    }
}

impl Default for ShortIdConfig {
    fn default() -> Self {
        Self {
            length: 6,
            max_attempts: 10,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Precedence: `SNIP__*` environment variables > `snip.toml` > defaults.
    /// A `.env` file is read first if present. Sections are separated by
    /// `__`, e.g. `SNIP__DATABASE__URL=postgres://...`.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("base_url", "http://127.0.0.1:5000/")?
            .set_default("database.backend", "sqlite")?
            .set_default("database.url", "sqlite://urls.db")?
            .set_default("database.max_connections", 5)?
            .set_default("short_id.length", 6)?
            .set_default("short_id.max_attempts", 10)?
            .set_default("redirect_status", "found")?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("invalid configuration")?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.short_id.length > 0, "short_id.length must be at least 1");
        ensure!(
            self.short_id.max_attempts > 0,
            "short_id.max_attempts must be at least 1"
        );
        ensure!(
            self.database.max_connections > 0,
            "database.max_connections must be at least 1"
        );
        ensure!(!self.base_url.is_empty(), "base_url must not be empty");
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
