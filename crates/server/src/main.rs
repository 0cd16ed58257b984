//! Server entry point

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use leadbot_config::{load_settings, Settings};
use leadbot_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Priority: env vars > config file > defaults
    let config_path = std::env::var("LEADBOT_CONFIG").ok().map(PathBuf::from);
    let settings = match load_settings(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            Settings::default()
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = settings.server.port,
        augment_enabled = settings.augment.enabled,
        "starting leadbot server"
    );

    let mut state = AppState::new(settings.clone());
    if let Some(handle) = init_metrics() {
        state = state.with_metrics(handle);
        tracing::info!("Prometheus metrics available at /metrics");
    }

    let _cleanup_shutdown = state.sessions.start_cleanup_task();

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
