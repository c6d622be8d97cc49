//! The task store: single owner of the task list.
//!
//! # Responsibility
//! - Hydrate from the persistence adapter once at startup.
//! - Apply mutations, mirror them to the adapter, notify the listener.
//!
//! # Invariants
//! - Insertion order is newest-first; `add` prepends.
//! - `stats().total == stats().completed + stats().pending` at all times.
//! - Every mutation that changed state is mirrored before the listener
//!   fires; no-ops neither persist nor notify.

use crate::model::task::{FilterMode, Task, TaskId, TaskStats, TaskValidationError};
use crate::repo::task_list_repo::{RepoError, TaskListRepository};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Change notification emitted after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Added(TaskId),
    Toggled(TaskId),
    Removed(TaskId),
    ClearedCompleted(usize),
}

/// Store-level error for mutation operations.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected before any state change.
    Validation(TaskValidationError),
    /// Adapter failure while mirroring an applied mutation.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

type ChangeListener = Box<dyn Fn(&StoreChange)>;

/// Single source of truth for the task list.
///
/// Constructed via [`TaskStore::open`], which hydrates from the adapter and
/// falls back to an empty list when the slot is absent or unreadable.
/// The store is single-actor: every operation runs to completion before the
/// next one starts, so no internal locking exists.
pub struct TaskStore<R: TaskListRepository> {
    repo: R,
    tasks: Vec<Task>,
    on_change: Option<ChangeListener>,
}

impl<R: TaskListRepository> TaskStore<R> {
    /// Hydrates a store from persistent state.
    ///
    /// Fails soft: an absent slot starts empty, and a load error is logged
    /// and degraded to the empty list rather than surfaced to the caller.
    /// Startup is never blocked by persisted state.
    pub fn open(repo: R) -> Self {
        let tasks = match repo.load() {
            Ok(Some(tasks)) => {
                info!(
                    "event=store_hydrate module=store status=ok count={}",
                    tasks.len()
                );
                tasks
            }
            Ok(None) => {
                info!("event=store_hydrate module=store status=ok count=0 slot=absent");
                Vec::new()
            }
            Err(err) => {
                warn!("event=store_hydrate module=store status=fallback error={err}");
                Vec::new()
            }
        };

        Self {
            repo,
            tasks,
            on_change: None,
        }
    }

    /// Registers the observer called after every successful mutation.
    ///
    /// The presentation layer subscribes here instead of re-rendering on a
    /// schedule of its own.
    pub fn set_change_listener(&mut self, listener: ChangeListener) {
        self.on_change = Some(listener);
    }

    /// Adds a new task to the front of the list and returns it.
    ///
    /// # Errors
    /// - [`StoreError::Validation`] when `text` trims to nothing; the list
    ///   is left unchanged.
    /// - [`StoreError::Repo`] when the adapter rejects the mirror write.
    pub fn add(&mut self, text: impl AsRef<str>) -> Result<Task, StoreError> {
        let task = match Task::new(text) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_add module=store status=rejected reason=empty_text");
                return Err(err.into());
            }
        };

        self.tasks.insert(0, task.clone());
        self.persist()?;
        debug!(
            "event=task_add module=store status=ok id={} text_len={}",
            task.id,
            task.text.len()
        );
        self.notify(StoreChange::Added(task.id));
        Ok(task)
    }

    /// Flips the completion flag of the task with `id`.
    ///
    /// Returns the new flag, or `None` when no task matches. The unknown-id
    /// case is a benign no-op so a stale frontend cannot fault the store.
    pub fn toggle(&mut self, id: TaskId) -> Result<Option<bool>, StoreError> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=store status=noop id={id}");
            return Ok(None);
        };

        task.toggle();
        let completed = task.completed;
        self.persist()?;
        debug!("event=task_toggle module=store status=ok id={id} completed={completed}");
        self.notify(StoreChange::Toggled(id));
        Ok(Some(completed))
    }

    /// Removes the task with `id`. Returns whether anything was removed.
    ///
    /// Removal takes effect immediately; any exit animation belongs to the
    /// presentation layer.
    pub fn delete(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_delete module=store status=noop id={id}");
            return Ok(false);
        }

        self.persist()?;
        debug!("event=task_delete module=store status=ok id={id}");
        self.notify(StoreChange::Removed(id));
        Ok(true)
    }

    /// Removes every completed task in one pass. Returns the removed count.
    ///
    /// Persists once; with nothing completed this is a pure no-op.
    pub fn clear_completed(&mut self) -> Result<usize, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_pending);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return Ok(0);
        }

        self.persist()?;
        info!("event=clear_completed module=store status=ok removed={removed}");
        self.notify(StoreChange::ClearedCompleted(removed));
        Ok(removed)
    }

    /// Returns tasks selected by `mode`, preserving list order. Pure query.
    pub fn filter(&self, mode: FilterMode) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| mode.matches(task))
            .collect()
    }

    /// Returns running counts for the current list. Pure query.
    pub fn stats(&self) -> TaskStats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        TaskStats {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Read-only view of the full list, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.repo.save(&self.tasks).map_err(StoreError::Repo)
    }

    fn notify(&self, change: StoreChange) {
        if let Some(listener) = &self.on_change {
            listener(&change);
        }
    }
}
