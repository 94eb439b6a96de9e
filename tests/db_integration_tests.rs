//! Integration tests for the database layer.
//!
//! These tests verify the repository operations using an in-memory SQLite database.

use rusqlite::params;
use task_list_web::db::{Database, StorageError};
use task_list_web::repository::TaskRepository;
use task_list_web::types::{ArchiveStatus, Task, TaskId};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

/// Insert a row with a NULL `archived` value, as legacy rows have.
fn insert_legacy_row(db: &Database, title: &str) -> TaskId {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO tasks (title, description, archived) VALUES (?1, NULL, NULL)",
            params![title],
        )?;
        Ok(conn.last_insert_rowid())
    })
    .expect("Failed to insert legacy row")
}

fn find(tasks: &[Task], title: &str) -> Task {
    tasks
        .iter()
        .find(|t| t.title == title)
        .cloned()
        .unwrap_or_else(|| panic!("task {title:?} not listed"))
}

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn create_then_list_returns_active_task() {
        let db = setup_db();

        db.create("Buy milk", "2%").await.expect("Failed to create task");

        let tasks = db.list_all().await.expect("Failed to list tasks");
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2%");
        assert_eq!(task.status, ArchiveStatus::Active);
    }

    #[tokio::test]
    async fn duplicate_titles_are_allowed() {
        let db = setup_db();

        db.create("Same", "one").await.unwrap();
        db.create("Same", "two").await.unwrap();

        let tasks = db.list_all().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[tokio::test]
    async fn empty_description_is_stored() {
        let db = setup_db();

        db.create("No details", "").await.unwrap();

        let task = find(&db.list_all().await.unwrap(), "No details");
        assert_eq!(task.description, "");
    }

    #[tokio::test]
    async fn markup_is_stored_verbatim() {
        let db = setup_db();

        db.create("<script>alert(1)</script>", "a & b").await.unwrap();

        let task = find(&db.list_all().await.unwrap(), "<script>alert(1)</script>");
        assert_eq!(task.description, "a & b");
    }
}

mod list_tests {
    use super::*;

    #[tokio::test]
    async fn empty_table_lists_nothing() {
        let db = setup_db();
        assert!(db.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn null_archived_maps_to_unknown() {
        let db = setup_db();
        let id = insert_legacy_row(&db, "Legacy");

        let task = find(&db.list_all().await.unwrap(), "Legacy");
        assert_eq!(task.id, id);
        assert_eq!(task.status, ArchiveStatus::Unknown);
        assert_eq!(task.description, "");
    }

    #[tokio::test]
    async fn missing_table_is_a_storage_error() {
        let db = setup_db();
        db.with_conn(|conn| conn.execute_batch("DROP TABLE tasks"))
            .unwrap();

        let err = db.list_all().await.unwrap_err();
        assert!(matches!(err, StorageError::Sqlite(_)));
        assert!(err.to_string().contains("no such table"));
    }
}

mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn delete_removes_task() {
        let db = setup_db();
        db.create("Keep", "").await.unwrap();
        db.create("Drop", "").await.unwrap();
        let id = find(&db.list_all().await.unwrap(), "Drop").id;

        db.delete(id).await.expect("Failed to delete task");

        let tasks = db.list_all().await.unwrap();
        assert!(tasks.iter().all(|t| t.id != id));
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn delete_absent_id_succeeds() {
        let db = setup_db();
        db.create("Only", "").await.unwrap();

        db.delete(9999).await.expect("Deleting an absent id should succeed");

        let tasks = db.list_all().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks.iter().all(|t| t.id != 9999));
    }

    #[tokio::test]
    async fn delete_twice_succeeds() {
        let db = setup_db();
        db.create("Once", "").await.unwrap();
        let id = find(&db.list_all().await.unwrap(), "Once").id;

        db.delete(id).await.unwrap();
        db.delete(id).await.unwrap();
        assert!(db.list_all().await.unwrap().is_empty());
    }
}

mod update_tests {
    use super::*;

    #[tokio::test]
    async fn update_title_changes_only_title() {
        let db = setup_db();
        db.create("Old title", "details").await.unwrap();
        let id = find(&db.list_all().await.unwrap(), "Old title").id;

        db.update_title(id, "New title").await.unwrap();

        let task = find(&db.list_all().await.unwrap(), "New title");
        assert_eq!(task.id, id);
        assert_eq!(task.description, "details");
        assert_eq!(task.status, ArchiveStatus::Active);
    }

    #[tokio::test]
    async fn update_absent_id_succeeds_without_changes() {
        let db = setup_db();
        db.create("Untouched", "").await.unwrap();

        db.update_title(424242, "Ghost").await.unwrap();

        let tasks = db.list_all().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Untouched");
    }
}

mod archive_tests {
    use super::*;

    #[tokio::test]
    async fn toggle_archives_then_restores() {
        let db = setup_db();
        db.create("Flip me", "").await.unwrap();
        let id = find(&db.list_all().await.unwrap(), "Flip me").id;

        db.toggle_archive(id).await.unwrap();
        assert_eq!(
            find(&db.list_all().await.unwrap(), "Flip me").status,
            ArchiveStatus::Archived
        );

        db.toggle_archive(id).await.unwrap();
        assert_eq!(
            find(&db.list_all().await.unwrap(), "Flip me").status,
            ArchiveStatus::Active
        );
    }

    #[tokio::test]
    async fn toggle_leaves_unknown_status_unknown() {
        let db = setup_db();
        let id = insert_legacy_row(&db, "Legacy");

        db.toggle_archive(id).await.unwrap();
        assert_eq!(
            find(&db.list_all().await.unwrap(), "Legacy").status,
            ArchiveStatus::Unknown
        );
    }

    #[tokio::test]
    async fn toggle_only_affects_target_row() {
        let db = setup_db();
        db.create("A", "").await.unwrap();
        db.create("B", "").await.unwrap();
        let a = find(&db.list_all().await.unwrap(), "A").id;

        db.toggle_archive(a).await.unwrap();

        let tasks = db.list_all().await.unwrap();
        assert_eq!(find(&tasks, "A").status, ArchiveStatus::Archived);
        assert_eq!(find(&tasks, "B").status, ArchiveStatus::Active);
    }

    #[tokio::test]
    async fn concurrent_toggles_are_not_lost() {
        let db = setup_db();
        db.create("Busy", "").await.unwrap();
        let id = find(&db.list_all().await.unwrap(), "Busy").id;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { db.toggle_archive(id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // An even number of flips lands back on the original value.
        assert_eq!(
            find(&db.list_all().await.unwrap(), "Busy").status,
            ArchiveStatus::Active
        );
    }
}

mod unavailable_tests {
    use super::*;

    #[tokio::test]
    async fn every_operation_fails_when_unavailable() {
        let db = Database::unavailable("could not connect");

        assert!(matches!(db.list_all().await, Err(StorageError::Unavailable(_))));
        assert!(matches!(db.create("t", "d").await, Err(StorageError::Unavailable(_))));
        assert!(matches!(db.delete(1).await, Err(StorageError::Unavailable(_))));
        assert!(matches!(
            db.update_title(1, "t").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            db.toggle_archive(1).await,
            Err(StorageError::Unavailable(_))
        ));
    }
}
