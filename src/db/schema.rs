//! Shape of the `tasks` table.
//!
//! File databases are provisioned outside this application. The DDL is only
//! applied automatically to in-memory databases.

use rusqlite::{Connection, params};

/// DDL for the single table the application reads and writes.
pub const TASKS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT,
    archived    BOOLEAN
);";

/// Check whether the `tasks` table exists.
pub fn tasks_table_exists(conn: &Connection) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params!["tasks"],
        |row| row.get(0),
    )
}
