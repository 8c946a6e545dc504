//! Error type shared by every storage operation.

use rusqlite::ffi;

/// Storage-level failure.
///
/// Constraint violations reported by SQLite are classified into
/// [`StorageError::Conflict`] and [`StorageError::InvalidReference`] so callers
/// can map them to user-facing responses without inspecting SQLite codes.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested row does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A unique constraint was violated (e.g. duplicate category name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Input rejected before reaching the database.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Any other SQLite error.
    #[error("database error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// A thread panicked while holding the database lock.
    #[error("database lock poisoned")]
    Poisoned,

    /// The blocking task running a store operation failed to complete.
    #[error("background task failed: {0}")]
    Background(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            let detail = message
                .clone()
                .unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::Conflict(detail);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::InvalidReference(detail),
                _ => {}
            }
        }
        Self::Sqlite(err)
    }
}

impl StorageError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
