use rusqlite::{params, OptionalExtension};

use crate::error::{Result, StorageError};
use crate::models::{Category, CategoryId, CategoryUpdate, NewCategory};

use super::helpers::normalize_label;
use super::Database;

impl Database {
    /// Number of category rows
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn count_categories(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert several categories in one transaction, skipping names that already exist.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails
    pub fn insert_categories(&self, names: &[&str]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO categories (name) VALUES (?1)")?;
            for name in names {
                inserted += stmt.execute(params![name])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Get all categories ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id")?;

        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category by ID
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such category exists
    pub fn get_category(&self, id: CategoryId) -> Result<Category> {
        self.conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1",
                params![id],
                Self::row_to_category,
            )
            .optional()?
            .ok_or_else(|| StorageError::not_found("category", id))
    }

    /// Create a category
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for a blank name and `Conflict` if the name is taken
    pub fn create_category(&self, new: &NewCategory) -> Result<Category> {
        let name = normalize_label("name", &new.name)?;
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
        let id = self.conn.last_insert_rowid();
        log::info!("Created category {id}: {name}");
        Ok(Category { id, name })
    }

    /// Rename a category
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Invalid` for a blank name, or `Conflict` if the name is taken
    pub fn update_category(&self, id: CategoryId, update: &CategoryUpdate) -> Result<Category> {
        let name = normalize_label("name", &update.name)?;
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(StorageError::not_found("category", id));
        }
        Ok(Category { id, name })
    }

    /// Delete a category; tasks referencing it keep existing with no category
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such category exists
    pub fn delete_category(&self, id: CategoryId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StorageError::not_found("category", id));
        }
        log::info!("Deleted category {id}");
        Ok(())
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}
