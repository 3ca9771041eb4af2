use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use snip::config::Config;
use snip::storage;
use snip::{build_state, web};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::load()?;
    info!("Loaded configuration");

    // Initialize storage
    let storage = storage::connect(&config.database)
        .await
        .context("failed to open storage")?;

    info!("Initializing database...");
    storage.init().await.context("failed to create schema")?;
    info!("Database initialized successfully");

    info!(
        length = config.short_id.length,
        max_attempts = config.short_id.max_attempts,
        "Short id allocation configured"
    );

    let app = web::create_router(build_state(&config, storage));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Server listening on http://{}", addr);
    info!("   - Short URLs are served as {}<short_id>", config.base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
