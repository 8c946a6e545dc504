use rusqlite::Connection;

use crate::error::Result;

/// Initialize database schema
///
/// # Errors
///
/// Returns an error if enabling foreign keys, table creation or index creation fails
pub fn init_schema(conn: &Connection) -> Result<()> {
    // SQLite leaves foreign key enforcement off per connection unless asked
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // Categories table - grouping labels for tasks
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    // Priorities table - ordered urgency labels
    conn.execute(
        "CREATE TABLE IF NOT EXISTS priorities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            rank INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    // Tasks table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            due_at TEXT NOT NULL,
            is_done INTEGER NOT NULL DEFAULT 0,
            category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
            priority_id INTEGER REFERENCES priorities(id) ON DELETE SET NULL,
            reminder_sent INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    // Add columns introduced after the first schema if they don't exist
    let columns_to_add = [("reminder_sent", "INTEGER NOT NULL DEFAULT 0")];

    for (column_name, column_type) in columns_to_add {
        let column_exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pragma_table_info('tasks') WHERE name = ?1",
            [column_name],
            |row| row.get(0),
        )?;

        if column_exists == 0 {
            conn.execute(
                &format!("ALTER TABLE tasks ADD COLUMN {column_name} {column_type}"),
                [],
            )?;
            log::info!("Added {column_name} column to tasks table");
        }
    }

    // The reminder scan filters on open tasks by due date
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_open_due ON tasks(is_done, due_at)",
        [],
    )?;

    Ok(())
}
