//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical record serialized into the persistence slot.
//! - Validate user-supplied text at construction time.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is non-empty and trimmed once a task exists; there is no edit
//!   operation.
//! - `created_at` is captured at creation and never rewritten.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Stable identifier for one task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Validation failure for task construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Input was empty or all-whitespace after trimming.
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text is empty after trimming"),
        }
    }
}

impl Error for TaskValidationError {}

/// One user-entered to-do item with completion status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Sole lookup key for toggle/delete.
    pub id: TaskId,
    /// Trimmed user-supplied text.
    pub text: String,
    /// Completion flag, the only mutable field.
    pub completed: bool,
    /// RFC 3339 UTC creation timestamp. Serialized as `createdAt` to match
    /// the persisted slot layout. Retained for potential future sorting,
    /// not used for ordering today.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Task {
    /// Creates a task from raw user input with a generated stable ID.
    ///
    /// Leading and trailing whitespace is trimmed before validation.
    ///
    /// # Errors
    /// - [`TaskValidationError::EmptyText`] when nothing remains after
    ///   trimming.
    pub fn new(text: impl AsRef<str>) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by test/import paths where identity already exists externally.
    pub fn with_id(id: TaskId, text: impl AsRef<str>) -> Result<Self, TaskValidationError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(Self {
            id,
            text: trimmed.to_string(),
            completed: false,
            created_at: rfc3339_now(),
        })
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Returns whether this task still needs doing.
    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

fn rfc3339_now() -> String {
    // Rfc3339 formatting of a UTC wall-clock value cannot fail in practice;
    // degrade to the default rendering rather than panic in core code.
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.to_string())
}

/// View filter over the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Identity: every task.
    All,
    /// Tasks with `completed == false`.
    Pending,
    /// Tasks with `completed == true`.
    Completed,
}

impl FilterMode {
    /// Returns whether `task` is selected by this mode.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Stable lowercase name used by CLI arguments and display copy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

/// Parse failure for filter mode names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterModeError(String);

impl Display for ParseFilterModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter mode `{}`; expected all|pending|completed",
            self.0
        )
    }
}

impl Error for ParseFilterModeError {}

impl FromStr for FilterMode {
    type Err = ParseFilterModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterModeError(other.to_string())),
        }
    }
}

/// Running counts derived from the current list.
///
/// Holds `total == completed + pending` by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}
