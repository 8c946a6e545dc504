use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use duely_core::{Config, LogNotifier, ReminderScheduler, ReminderSettings};
use duely_storage::Store;

use super::open_seeded_database;

pub async fn serve_command(config: &Config) -> Result<()> {
    let store = Store::new(open_seeded_database(config)?);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    let cancel = CancellationToken::new();
    let scheduler = ReminderScheduler::new(
        Arc::new(store.clone()),
        Arc::new(LogNotifier),
        ReminderSettings::from(config),
    );
    let scheduler_handle = scheduler.spawn(cancel.clone());

    let result = duely_api::serve(listener, store, shutdown_signal()).await;

    cancel.cancel();
    if let Err(e) = scheduler_handle.await {
        log::error!("Reminder scheduler task failed: {e}");
    }
    log::info!("duely shut down gracefully.");

    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        // No other shutdown trigger exists
        std::future::pending::<()>().await;
    }
    log::info!("Received Ctrl-C, shutting down...");
}
