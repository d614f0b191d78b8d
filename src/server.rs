use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use memebox::api::{self, state::AppState};
use memebox::collector::{self, CycleBudget, CycleController, Downloader};
use memebox::config::Config;
use memebox::remote::HttpCoordinator;
use memebox::store::RecordStore;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Service bootstrap: wire the store, coordinator client, collector loop
/// and HTTP surface together, then serve until shutdown.
pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Arc::new(Config::load()?);

    info!(path = %config.server.store_path.display(), "Opening record store");
    let store = Arc::new(RecordStore::open(&config.server.store_path)?);

    std::fs::create_dir_all(&config.collector.image_dir)?;

    let coordinator = Arc::new(HttpCoordinator::new(
        config.remote.base_url.clone(),
        config.remote.api_key.clone(),
        config.collector.connect_timeout(),
        config.collector.request_timeout(),
    )?);

    let downloader = Downloader::new(
        store.clone(),
        coordinator.clone(),
        coordinator.http_client(),
        config.collector.image_dir.clone(),
    );
    let controller = CycleController::new(
        coordinator,
        downloader,
        CycleBudget {
            interval: config.collector.cycle_interval(),
            reserve: config.collector.download_reserve(),
        },
    );

    let collector_task =
        tokio::spawn(collector::run(controller, config.collector.cycle_interval()));

    let address = address.unwrap_or(config.server.bind_addr);
    let app = api::router(AppState::new(config, store.clone()));

    let listener = TcpListener::bind(address).await?;
    info!(%address, "memebox listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    collector_task.abort();
    if let Err(e) = store.persist() {
        warn!(error = %e, "Failed to flush record store at shutdown");
    }
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
