//! Task CRUD operations, one SQL statement each.

use super::{Database, StorageResult};
use crate::types::{ArchiveStatus, Task, TaskId};
use rusqlite::{Row, params};
use tracing::debug;

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let archived: Option<bool> = row.get("archived")?;
    let description: Option<String> = row.get("description")?;
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: description.unwrap_or_default(),
        status: ArchiveStatus::from_column(archived),
    })
}

impl Database {
    /// List every task in the order the engine returns them.
    pub fn list_tasks(&self) -> StorageResult<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, title, description, archived FROM tasks")?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Insert a new, non-archived task.
    pub fn create_task(&self, title: &str, description: &str) -> StorageResult<()> {
        let id = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, archived) VALUES (?1, ?2, ?3)",
                params![title, description, false],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(task_id = id, "task created");
        Ok(())
    }

    /// Delete a task. Deleting an absent id is not an error.
    pub fn delete_task(&self, id: TaskId) -> StorageResult<()> {
        let affected =
            self.with_conn(|conn| conn.execute("DELETE FROM tasks WHERE id = ?1", params![id]))?;
        debug!(task_id = id, affected, "task delete");
        Ok(())
    }

    /// Overwrite a task's title. Zero affected rows is not an error.
    pub fn update_task_title(&self, id: TaskId, title: &str) -> StorageResult<()> {
        let affected = self.with_conn(|conn| {
            conn.execute(
                "UPDATE tasks SET title = ?1 WHERE id = ?2",
                params![title, id],
            )
        })?;
        debug!(task_id = id, affected, "task title update");
        Ok(())
    }

    /// Flip the archived flag in a single statement.
    ///
    /// `NOT NULL` is `NULL`, so a task with unknown status stays unknown.
    pub fn toggle_task_archived(&self, id: TaskId) -> StorageResult<()> {
        let affected = self.with_conn(|conn| {
            conn.execute(
                "UPDATE tasks SET archived = NOT archived WHERE id = ?1",
                params![id],
            )
        })?;
        debug!(task_id = id, affected, "task archive toggle");
        Ok(())
    }
}
