// Costlens - Web Server
// REST API + static front-end with Axum

use anyhow::{Context, Result};
use costlens::api::{router, AppState};
use costlens::{build_service, init_tracing, load_rankings, Config, Rankings};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    // Static rankings - a missing file leaves the listing empty
    let rankings = match load_rankings(&config.rankings_path) {
        Ok(rankings) => {
            info!(cities = rankings.len(), "loaded rankings from static database");
            rankings
        }
        Err(e) => {
            error!(error = %e, path = ?config.rankings_path, "failed to load rankings");
            Rankings::default()
        }
    };

    let state = AppState {
        service: build_service(&config)?,
        rankings: Arc::new(rankings),
    };

    let app = router(state, &config.public_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, source = %config.source_url, "server running");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
