use anyhow::{Context, Result};
use tracing::info;

use translate_map::config::Config;
use translate_map::db::Database;
use translate_map::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translate_map=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    if config.admin_api_key.is_none() {
        tracing::warn!("ADMIN_API_KEY is not set, admin API will reject every request");
    }

    info!("Opening database at {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    let addr = format!("0.0.0.0:{}", config.port);
    let app = router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
