use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{error, info};

use linkvault::config::AppConfig;
use linkvault::logging::init_logging;
use linkvault::services::LinkService;
use linkvault::storage::StoreFactory;

/// Deadline for the delete worker to finish its final flush and exit.
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_simple());
            std::process::exit(1);
        }
    };

    // Guard must stay alive so buffered log writes are flushed.
    let _log_guard = init_logging(&config);

    let store = match StoreFactory::create(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("failed to create storage backend: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = store.initialize().await {
        error!("failed to initialize storage backend: {}", e);
        std::process::exit(1);
    }
    info!("storage backend ready: {}", store.backend_name());

    let service = Arc::new(LinkService::new(store, config.delete_pipeline.clone()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = match service.start_delete_worker(shutdown_rx) {
        Ok(handle) => handle,
        Err(e) => {
            error!("failed to start delete worker: {}", e);
            std::process::exit(1);
        }
    };

    // The transport layer attaches to `service` here; this binary only
    // exercises the bootstrap and lifecycle surface.
    info!("linkvault running, press Ctrl+C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
    }

    info!("shutdown signal received, stopping delete worker");
    shutdown_tx.send(true).ok();

    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), worker).await {
        Ok(Ok(())) => info!("delete worker stopped cleanly"),
        Ok(Err(e)) => error!("delete worker task failed: {}", e),
        Err(_) => error!(
            "delete worker did not stop within {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }

    info!("shutdown complete");
}
