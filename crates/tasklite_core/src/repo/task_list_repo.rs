//! Task list persistence: contract and SQLite slot implementation.
//!
//! # Responsibility
//! - Mirror the whole task list into a single named slot on save.
//! - Hydrate an equivalent list (or report absence) on load.
//!
//! # Invariants
//! - The slot value is always the JSON serialization of the entire list.
//! - `load()` on a fresh environment reports absence, not failure.

use crate::db::DbError;
use crate::model::task::{Task, TaskId};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the serialized task list.
pub const TASKS_SLOT_KEY: &str = "tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence adapter error for save/load operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Stored slot value is not a valid task list document.
    Decode(serde_json::Error),
    /// In-memory list could not be serialized.
    Encode(serde_json::Error),
    /// Slot decoded cleanly but violates a model invariant.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "cannot decode persisted task list: {err}"),
            Self::Encode(err) => write!(f, "cannot encode task list: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task list: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Save/load contract consumed by the task store.
///
/// `load()` after a prior `save()` in the same environment must return a
/// field-wise equivalent list, including the empty list.
pub trait TaskListRepository {
    fn save(&self, tasks: &[Task]) -> RepoResult<()>;
    fn load(&self) -> RepoResult<Option<Vec<Task>>>;
}

/// SQLite-backed adapter storing the list under one named slot.
pub struct SqliteTaskListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskListRepository for SqliteTaskListRepository<'_> {
    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let value = serde_json::to_string(tasks).map_err(RepoError::Encode)?;
        self.conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![TASKS_SLOT_KEY, value],
        )?;
        Ok(())
    }

    fn load(&self) -> RepoResult<Option<Vec<Task>>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1;",
                params![TASKS_SLOT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(value) = stored else {
            return Ok(None);
        };

        let tasks: Vec<Task> = serde_json::from_str(&value).map_err(RepoError::Decode)?;
        validate_loaded(&tasks)?;
        Ok(Some(tasks))
    }
}

fn validate_loaded(tasks: &[Task]) -> RepoResult<()> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.text.trim().is_empty() {
            return Err(RepoError::InvalidData(format!(
                "task {} has empty text",
                task.id
            )));
        }
        if !seen.insert(task.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }
    Ok(())
}
