pub mod scan;
pub mod seed;
pub mod serve;

use anyhow::{Context, Result};
use duely_core::Config;
use duely_storage::{seed_defaults, Database};

/// Open the configured database. Failure here is fatal to startup.
pub fn open_database(config: &Config) -> Result<Database> {
    Database::new(Some(config.database_path.clone())).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database_path.display()
        )
    })
}

/// Open the configured database and make sure the reference data exists.
pub fn open_seeded_database(config: &Config) -> Result<Database> {
    let db = open_database(config)?;
    seed_defaults(&db).context("Failed to seed reference data")?;
    Ok(db)
}
