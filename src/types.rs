//! Core types for the task list.

use serde::{Deserialize, Serialize};

/// Database-assigned task identifier.
pub type TaskId = i64;

/// Archive status of a task, mapped from the nullable `archived` column.
///
/// `Unknown` covers rows whose `archived` value is `NULL`, e.g. rows written
/// before the column existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveStatus {
    Unknown,
    Active,
    Archived,
}

impl ArchiveStatus {
    /// Map a nullable `archived` column value to a status.
    pub fn from_column(archived: Option<bool>) -> Self {
        match archived {
            None => ArchiveStatus::Unknown,
            Some(false) => ArchiveStatus::Active,
            Some(true) => ArchiveStatus::Archived,
        }
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: ArchiveStatus,
}
