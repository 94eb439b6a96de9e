//! Database layer for the task list.

pub mod schema;
pub mod tasks;

use crate::config::DatabaseConfig;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure originating from the database collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// The database could not be opened at startup.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("database connection lock poisoned")]
    Poisoned,

    /// A blocking storage call panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Join(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Clone)]
enum Handle {
    Open(Arc<Mutex<Connection>>),
    Unavailable(Arc<str>),
}

/// Database handle wrapping a SQLite connection.
///
/// Cloning is cheap; every clone shares the same connection.
#[derive(Clone)]
pub struct Database {
    handle: Handle,
}

impl Database {
    /// Open the database described by `config` and check that it answers.
    ///
    /// The `tasks` table is expected to exist already.
    pub fn open(config: &DatabaseConfig) -> StorageResult<Self> {
        let conn = Connection::open(&config.path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;

        if !schema::tasks_table_exists(&conn)? {
            warn!(
                "Table 'tasks' not found in {:?}; requests will fail until it is created",
                config.path
            );
        }

        info!("Connected to database at {:?}", config.path);
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory database with the `tasks` table (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::TASKS_TABLE)?;
        Ok(Self::from_connection(conn))
    }

    /// A handle for a database that could not be opened.
    ///
    /// Every operation on it fails with [`StorageError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self {
            handle: Handle::Unavailable(reason.into()),
        }
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            handle: Handle::Open(Arc::new(Mutex::new(conn))),
        }
    }

    /// Execute a function with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        match &self.handle {
            Handle::Open(conn) => {
                let conn = conn.lock().map_err(|_| StorageError::Poisoned)?;
                Ok(f(&conn)?)
            }
            Handle::Unavailable(reason) => Err(StorageError::Unavailable(reason.to_string())),
        }
    }

    /// Release the connection.
    ///
    /// The connection is closed immediately when this is the last handle;
    /// otherwise it closes when the remaining clones are dropped.
    pub fn close(self) -> StorageResult<()> {
        let Handle::Open(conn) = self.handle else {
            return Ok(());
        };
        match Arc::try_unwrap(conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().map_err(|_| StorageError::Poisoned)?;
                conn.close().map_err(|(_, err)| StorageError::Sqlite(err))?;
                info!("Database connection closed");
            }
            Err(_) => debug!("Database still shared; connection closes with the last handle"),
        }
        Ok(())
    }
}
