use anyhow::{Context, Result};
use duely_core::Config;
use duely_storage::seed_defaults;

use super::open_database;

pub fn seed_command(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let report = seed_defaults(&db).context("Failed to seed reference data")?;

    if report.is_empty() {
        println!("Reference data already present; nothing to seed.");
    } else {
        println!(
            "Seeded {} categories and {} priorities.",
            report.categories, report.priorities
        );
    }
    Ok(())
}
