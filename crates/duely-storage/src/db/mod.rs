//! Database operations split into domain-specific modules.
//!
//! This module exposes the main Database struct; categories, priorities and
//! tasks each add their operations in a submodule.

mod categories;
pub mod helpers;
mod priorities;
mod tasks;

use rusqlite::Connection;
use std::path::PathBuf;

use crate::error::{Result, StorageError};
use crate::migrations;

/// Database connection wrapper
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Open (or create) the database file and initialize the schema.
    ///
    /// `None` opens the default location under the user's local data directory.
    /// The special path `:memory:` opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation, connection opening, or schema initialization fails
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = db_path.unwrap_or_else(Self::default_db_path);

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Invalid(format!(
                    "failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(&path)?;
        migrations::init_schema(&conn)?;

        log::info!("Database initialized at: {}", path.display());

        Ok(Self { conn })
    }

    /// Open a private in-memory database with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns an error if schema initialization fails
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get default database path
    #[must_use]
    pub fn default_db_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("duely");
        path.push("duely.db");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("duely.db");

        Database::new(Some(path.clone())).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_new_accepts_memory_path() {
        let db = Database::new(Some(PathBuf::from(":memory:"))).unwrap();
        assert_eq!(db.count_categories().unwrap(), 0);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duely.db");

        {
            let db = Database::new(Some(path.clone())).unwrap();
            db.insert_categories(&["Errands"]).unwrap();
        }

        let db = Database::new(Some(path)).unwrap();
        let names: Vec<String> = db
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Errands".to_string()]);
    }
}
