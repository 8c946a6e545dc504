use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension};

use crate::error::{Result, StorageError};
use crate::models::{NewTask, Task, TaskId, TaskUpdate, TaskView};

use super::helpers::{format_datetime, normalize_label, parse_datetime};
use super::Database;

const TASK_VIEW_SELECT: &str =
    "SELECT t.id, t.title, t.description, t.due_at, t.is_done, t.category_id, t.priority_id,
            t.reminder_sent, c.name, p.name
     FROM tasks t
     LEFT JOIN categories c ON c.id = t.category_id
     LEFT JOIN priorities p ON p.id = t.priority_id";

/// How far ahead a task created without a due date is scheduled
const DEFAULT_DUE_IN_DAYS: i64 = 1;

impl Database {
    /// Get all tasks, most urgent priority first, then by due date
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn list_tasks(&self) -> Result<Vec<TaskView>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_VIEW_SELECT}
             ORDER BY p.rank IS NULL, p.rank DESC, t.due_at, t.id"
        ))?;

        let tasks = stmt
            .query_map([], Self::row_to_task_view)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Get a task by ID
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such task exists
    pub fn get_task(&self, id: TaskId) -> Result<TaskView> {
        self.conn
            .query_row(
                &format!("{TASK_VIEW_SELECT} WHERE t.id = ?1"),
                params![id],
                Self::row_to_task_view,
            )
            .optional()?
            .ok_or_else(|| StorageError::not_found("task", id))
    }

    /// Create a task. A missing `due_at` defaults to one day after `now`.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for a blank title and `InvalidReference` for an
    /// unknown category or priority
    pub fn create_task(&self, new: &NewTask, now: DateTime<Utc>) -> Result<TaskView> {
        let title = normalize_label("title", &new.title)?;
        let due_at = new
            .due_at
            .unwrap_or_else(|| now + Duration::days(DEFAULT_DUE_IN_DAYS));

        self.conn.execute(
            "INSERT INTO tasks (title, description, due_at, is_done, category_id, priority_id, reminder_sent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
            params![
                title,
                new.description,
                format_datetime(due_at),
                new.is_done,
                new.category_id,
                new.priority_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("Created task {id}: {title} (due {due_at})");

        self.get_task(id)
    }

    /// Apply a partial update to a task.
    ///
    /// Moving the due date, or reopening a finished task, clears the
    /// reminder flag so the task is reminded again.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Invalid` for a blank title, or `InvalidReference`
    /// for an unknown category or priority
    pub fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<TaskView> {
        let tx = self.conn.unchecked_transaction()?;

        let current = self.get_task(id)?.task;
        let title = match &update.title {
            Some(title) => normalize_label("title", title)?,
            None => current.title.clone(),
        };
        let due_at = update.due_at.unwrap_or(current.due_at);
        let is_done = update.is_done.unwrap_or(current.is_done);
        let reopened = current.is_done && !is_done;
        // Stored times carry microseconds; sub-microsecond input is the same due time
        let rescheduled = format_datetime(due_at) != format_datetime(current.due_at);
        let reminder_sent = current.reminder_sent && !rescheduled && !reopened;

        tx.execute(
            "UPDATE tasks
             SET title = ?1, description = ?2, due_at = ?3, is_done = ?4,
                 category_id = ?5, priority_id = ?6, reminder_sent = ?7
             WHERE id = ?8",
            params![
                title,
                update.description.clone().unwrap_or(current.description),
                format_datetime(due_at),
                is_done,
                update.category_id.unwrap_or(current.category_id),
                update.priority_id.unwrap_or(current.priority_id),
                reminder_sent,
                id,
            ],
        )?;
        tx.commit()?;

        self.get_task(id)
    }

    /// Delete a task
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such task exists
    pub fn delete_task(&self, id: TaskId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StorageError::not_found("task", id));
        }
        log::info!("Deleted task {id}");
        Ok(())
    }

    /// Get open tasks with `from <= due_at <= until`, soonest first.
    ///
    /// Unless `include_reminded` is set, tasks whose reminder was already
    /// dispatched are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn due_tasks(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        include_reminded: bool,
    ) -> Result<Vec<TaskView>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_VIEW_SELECT}
             WHERE t.is_done = 0
               AND t.due_at >= ?1
               AND t.due_at <= ?2
               AND (?3 OR t.reminder_sent = 0)
             ORDER BY t.due_at, p.rank DESC, t.id"
        ))?;

        let tasks = stmt
            .query_map(
                params![format_datetime(from), format_datetime(until), include_reminded],
                Self::row_to_task_view,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Record that a reminder was dispatched for a task
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such task exists
    pub fn mark_reminder_sent(&self, id: TaskId) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET reminder_sent = 1 WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(StorageError::not_found("task", id));
        }
        Ok(())
    }

    fn row_to_task_view(row: &rusqlite::Row) -> rusqlite::Result<TaskView> {
        Ok(TaskView {
            task: Task {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                due_at: parse_datetime(&row.get::<_, String>(3)?)?,
                is_done: row.get(4)?,
                category_id: row.get(5)?,
                priority_id: row.get(6)?,
                reminder_sent: row.get(7)?,
            },
            category: row.get(8)?,
            priority: row.get(9)?,
        })
    }
}
