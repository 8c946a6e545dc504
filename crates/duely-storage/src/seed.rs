//! Default reference data inserted on first start.

use crate::db::Database;
use crate::error::Result;

/// Categories seeded into an empty `categories` table
pub const DEFAULT_CATEGORIES: &[&str] = &["Work", "Personal"];

/// Priorities seeded into an empty `priorities` table, as `(name, rank)`
pub const DEFAULT_PRIORITIES: &[(&str, i64)] = &[("Low", 1), ("Medium", 2), ("High", 3)];

/// Rows inserted by one seeding pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub priorities: usize,
}

impl SeedReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories == 0 && self.priorities == 0
    }
}

/// Populate the reference tables if they are empty.
///
/// A table that already holds any row is left alone, so user edits survive
/// restarts. Inserts ignore duplicate names, which keeps two processes
/// seeding the same file at once from failing.
///
/// # Errors
///
/// Returns an error if the database cannot be queried or written
pub fn seed_defaults(db: &Database) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if db.count_categories()? == 0 {
        report.categories = db.insert_categories(DEFAULT_CATEGORIES)?;
    }

    if db.count_priorities()? == 0 {
        report.priorities = db.insert_priorities(DEFAULT_PRIORITIES)?;
    }

    if report.is_empty() {
        log::debug!("Reference data already present, nothing seeded");
    } else {
        log::info!(
            "Seeded {} categories and {} priorities",
            report.categories,
            report.priorities
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCategory;

    #[test]
    fn test_seed_populates_empty_tables() {
        let db = Database::open_in_memory().unwrap();
        let report = seed_defaults(&db).unwrap();

        assert_eq!(
            report,
            SeedReport {
                categories: 2,
                priorities: 3
            }
        );

        let categories: Vec<String> = db
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(categories, vec!["Work", "Personal"]);

        let priorities: Vec<(String, i64)> = db
            .list_priorities()
            .unwrap()
            .into_iter()
            .map(|p| (p.name, p.rank))
            .collect();
        assert_eq!(
            priorities,
            vec![
                ("High".to_string(), 3),
                ("Medium".to_string(), 2),
                ("Low".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_seed_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        for _ in 0..5 {
            seed_defaults(&db).unwrap();
        }

        assert_eq!(db.count_categories().unwrap(), 2);
        assert_eq!(db.count_priorities().unwrap(), 3);
        assert!(seed_defaults(&db).unwrap().is_empty());
    }

    #[test]
    fn test_seed_never_runs_leaves_tables_empty() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.count_categories().unwrap(), 0);
        assert_eq!(db.count_priorities().unwrap(), 0);
    }

    #[test]
    fn test_seed_skips_table_with_user_rows() {
        let db = Database::open_in_memory().unwrap();
        db.create_category(&NewCategory {
            name: "Garden".to_string(),
        })
        .unwrap();

        let report = seed_defaults(&db).unwrap();

        assert_eq!(report.categories, 0);
        assert_eq!(report.priorities, 3);
        assert_eq!(db.count_categories().unwrap(), 1);
    }

    #[test]
    fn test_seed_survives_restart_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duely.db");

        for _ in 0..3 {
            let db = Database::new(Some(path.clone())).unwrap();
            seed_defaults(&db).unwrap();
        }

        let db = Database::new(Some(path)).unwrap();
        assert_eq!(db.count_categories().unwrap(), 2);
        assert_eq!(db.count_priorities().unwrap(), 3);
    }
}
