use rusqlite::{params, OptionalExtension};

use crate::error::{Result, StorageError};
use crate::models::{NewPriority, Priority, PriorityId, PriorityUpdate};

use super::helpers::normalize_label;
use super::Database;

impl Database {
    /// Number of priority rows
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn count_priorities(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM priorities", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert several `(name, rank)` priorities in one transaction, skipping existing names.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails
    pub fn insert_priorities(&self, rows: &[(&str, i64)]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO priorities (name, rank) VALUES (?1, ?2)")?;
            for (name, rank) in rows {
                inserted += stmt.execute(params![name, rank])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Get all priorities, most urgent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn list_priorities(&self) -> Result<Vec<Priority>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, rank FROM priorities ORDER BY rank DESC, id")?;

        let priorities = stmt
            .query_map([], Self::row_to_priority)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(priorities)
    }

    /// Get a priority by ID
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such priority exists
    pub fn get_priority(&self, id: PriorityId) -> Result<Priority> {
        self.conn
            .query_row(
                "SELECT id, name, rank FROM priorities WHERE id = ?1",
                params![id],
                Self::row_to_priority,
            )
            .optional()?
            .ok_or_else(|| StorageError::not_found("priority", id))
    }

    /// Create a priority
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for a blank name and `Conflict` if the name is taken
    pub fn create_priority(&self, new: &NewPriority) -> Result<Priority> {
        let name = normalize_label("name", &new.name)?;
        self.conn.execute(
            "INSERT INTO priorities (name, rank) VALUES (?1, ?2)",
            params![name, new.rank],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("Created priority {id}: {name} (rank {})", new.rank);
        Ok(Priority {
            id,
            name,
            rank: new.rank,
        })
    }

    /// Update a priority's name and/or rank
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Invalid` for a blank name, or `Conflict` if the name is taken
    pub fn update_priority(&self, id: PriorityId, update: &PriorityUpdate) -> Result<Priority> {
        let tx = self.conn.unchecked_transaction()?;

        let current = self.get_priority(id)?;
        let name = match &update.name {
            Some(name) => normalize_label("name", name)?,
            None => current.name,
        };
        let rank = update.rank.unwrap_or(current.rank);

        tx.execute(
            "UPDATE priorities SET name = ?1, rank = ?2 WHERE id = ?3",
            params![name, rank, id],
        )?;
        tx.commit()?;

        Ok(Priority { id, name, rank })
    }

    /// Delete a priority; tasks referencing it keep existing with no priority
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such priority exists
    pub fn delete_priority(&self, id: PriorityId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM priorities WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StorageError::not_found("priority", id));
        }
        log::info!("Deleted priority {id}");
        Ok(())
    }

    fn row_to_priority(row: &rusqlite::Row) -> rusqlite::Result<Priority> {
        Ok(Priority {
            id: row.get(0)?,
            name: row.get(1)?,
            rank: row.get(2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_priorities_orders_by_rank() {
        let db = Database::open_in_memory().unwrap();
        db.insert_priorities(&[("Low", 1), ("High", 3), ("Medium", 2)])
            .unwrap();

        let names: Vec<String> = db
            .list_priorities()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["High", "Medium", "Low"]);
    }

    #[test]
    fn test_update_priority_keeps_unspecified_fields() {
        let db = Database::open_in_memory().unwrap();
        let created = db
            .create_priority(&NewPriority {
                name: "Urgent".to_string(),
                rank: 10,
            })
            .unwrap();

        let updated = db
            .update_priority(
                created.id,
                &PriorityUpdate {
                    name: None,
                    rank: Some(20),
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Urgent");
        assert_eq!(updated.rank, 20);
        assert_eq!(db.get_priority(created.id).unwrap(), updated);
    }

    #[test]
    fn test_conflicting_priority_update_changes_nothing() {
        let db = Database::open_in_memory().unwrap();
        db.insert_priorities(&[("Low", 1), ("High", 3)]).unwrap();
        let low = db
            .list_priorities()
            .unwrap()
            .into_iter()
            .find(|p| p.name == "Low")
            .unwrap();

        let err = db
            .update_priority(
                low.id,
                &PriorityUpdate {
                    name: Some("High".to_string()),
                    rank: Some(7),
                },
            )
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(db.get_priority(low.id).unwrap(), low);

        // The connection is usable again once the failed transaction is gone
        let updated = db
            .update_priority(
                low.id,
                &PriorityUpdate {
                    name: None,
                    rank: Some(7),
                },
            )
            .unwrap();
        assert_eq!(updated.rank, 7);
    }

    #[test]
    fn test_blank_priority_name_is_invalid() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .create_priority(&NewPriority {
                name: " ".to_string(),
                rank: 1,
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::Invalid(_)));
    }

    #[test]
    fn test_delete_missing_priority_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.delete_priority(9),
            Err(StorageError::NotFound {
                entity: "priority",
                ..
            })
        ));
    }
}
