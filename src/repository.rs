//! Repository port the web layer talks to.

use crate::db::{Database, StorageError, StorageResult};
use crate::types::{Task, TaskId};
use async_trait::async_trait;

/// Task persistence contract. Each operation is one storage statement.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns every task, in no guaranteed order.
    async fn list_all(&self) -> StorageResult<Vec<Task>>;

    /// Stores a new task with status `Active`.
    async fn create(&self, title: &str, description: &str) -> StorageResult<()>;

    /// Removes a task. Succeeds whether or not the id exists.
    async fn delete(&self, id: TaskId) -> StorageResult<()>;

    /// Overwrites a task's title. Succeeds whether or not the id exists.
    async fn update_title(&self, id: TaskId, new_title: &str) -> StorageResult<()>;

    /// Flips `Active` and `Archived`; `Unknown` stays `Unknown`.
    async fn toggle_archive(&self, id: TaskId) -> StorageResult<()>;
}

/// Run a synchronous storage call on the blocking pool.
async fn run_blocking<F, T>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Join(e.to_string()))?
}

#[async_trait]
impl TaskRepository for Database {
    async fn list_all(&self) -> StorageResult<Vec<Task>> {
        let db = self.clone();
        run_blocking(move || db.list_tasks()).await
    }

    async fn create(&self, title: &str, description: &str) -> StorageResult<()> {
        let db = self.clone();
        let title = title.to_string();
        let description = description.to_string();
        run_blocking(move || db.create_task(&title, &description)).await
    }

    async fn delete(&self, id: TaskId) -> StorageResult<()> {
        let db = self.clone();
        run_blocking(move || db.delete_task(id)).await
    }

    async fn update_title(&self, id: TaskId, new_title: &str) -> StorageResult<()> {
        let db = self.clone();
        let new_title = new_title.to_string();
        run_blocking(move || db.update_task_title(id, &new_title)).await
    }

    async fn toggle_archive(&self, id: TaskId) -> StorageResult<()> {
        let db = self.clone();
        run_blocking(move || db.toggle_task_archived(id)).await
    }
}
