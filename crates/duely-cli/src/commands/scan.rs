use anyhow::Result;
use std::sync::Arc;

use duely_core::{Config, LogNotifier, ReminderScheduler, ReminderSettings};
use duely_storage::Store;

use super::open_seeded_database;

pub async fn scan_command(config: &Config) -> Result<()> {
    let store = Store::new(open_seeded_database(config)?);
    let scheduler = ReminderScheduler::new(
        Arc::new(store),
        Arc::new(LogNotifier),
        ReminderSettings::from(config),
    );

    let report = scheduler.scan().await?;
    println!(
        "{} task(s) due within {} minutes: {} reminder(s) sent, {} failed.",
        report.matched,
        config.reminder_window.num_minutes(),
        report.dispatched,
        report.failed
    );
    Ok(())
}
