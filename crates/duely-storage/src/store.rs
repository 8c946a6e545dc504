//! Shared handle to the database used by the HTTP handlers and the reminder scheduler.

use std::sync::{Arc, Mutex};

use crate::db::Database;
use crate::error::{Result, StorageError};

/// Cloneable, thread-safe handle to a single [`Database`].
///
/// The lock is held for exactly one call, so every operation runs as its own
/// short statement or transaction.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<Database>>,
}

impl Store {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    /// Run `f` against the database on the current thread.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if another thread panicked while holding the lock,
    /// otherwise whatever `f` returns
    pub fn with<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let db = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        f(&db)
    }

    /// Run `f` against the database on tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// Returns `Background` if the blocking task panicked or was cancelled,
    /// otherwise the same errors as [`Store::with`]
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.with(f))
            .await
            .map_err(|e| StorageError::Background(e.to_string()))?
    }
}
