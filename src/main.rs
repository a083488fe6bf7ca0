//! bizbook server entry point
//!
//! Reads the YAML file named by `BIZBOOK_CONFIG` (defaults otherwise) and
//! serves the REST API until interrupted.

use bizbook::config::AppConfig;
use bizbook::server::ServerBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration failed: {e}");
        e
    })?;

    ServerBuilder::new().with_config(config).serve().await
}
