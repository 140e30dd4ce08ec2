use std::time::Duration;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use edudesk::edudesk_config::{Settings, SettingsHandle, config_path, spawn_watcher};
use edudesk::logging::init_tracing;
use edudesk::router::init_router;
use edudesk::state::init_app_state;

const CONFIG_POLL_INTERVAL: Duration = Duration::from_secs(5);

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let path = config_path();
    let settings = Settings::load(Some(path.as_path()))
        .with_context(|| format!("failed to load settings from {}", path.display()))?;
    init_tracing(&settings.log, settings.server.mode)?;

    let address = settings.server.bind_address();
    let handle = SettingsHandle::new(settings);
    spawn_watcher(path, handle.clone(), CONFIG_POLL_INTERVAL);

    let state = init_app_state(handle).await?;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "server listening");
    info!("Swagger UI available at http://{address}/swagger");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
