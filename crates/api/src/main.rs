use std::sync::Arc;

use sharebook_api::app::{build_app, build_services};
use sharebook_infra::{AppConfig, RefreshTokenSweeper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sharebook_observability::init();

    let config = AppConfig::from_env()?;
    tracing::info!(config = ?config, "configuration loaded");

    let services = Arc::new(build_services(&config.auth_config())?);
    let sweeper = RefreshTokenSweeper::new(config.token_sweep_interval)
        .spawn(services.refresh_tokens.clone())?;

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.shutdown();
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
