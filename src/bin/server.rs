//! Veracity HTTP server binary.
//!
//! Reads configuration from `VERACITY_CONFIG` (optional TOML file) and the
//! API key from `EXA_API_KEY`, then serves `GET /search` until Ctrl-C.

use veracity::{ServerConfig, VeracityServer, build_pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;
    tracing::info!(?config, "veracity-server starting");

    let pipeline = build_pipeline(&config)?;
    let server = VeracityServer::start(pipeline, &config).await?;

    tokio::signal::ctrl_c().await?;

    tracing::info!(addr = %server.addr(), "veracity-server shutting down");
    server.shutdown();
    Ok(())
}
