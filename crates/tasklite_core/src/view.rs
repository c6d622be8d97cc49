//! Pure render projection from store state to a display view-model.
//!
//! # Responsibility
//! - Map `(tasks, filter)` to a frontend-agnostic [`TaskListView`].
//! - Normalize user text so it cannot corrupt a line-oriented display.
//!
//! # Invariants
//! - Rendering never mutates store state and performs no I/O.
//! - Raw task text stays untouched in the model; only the projection is
//!   normalized.

use crate::model::task::{FilterMode, Task, TaskId, TaskStats};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One renderable line of the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    /// Normalized single-line text safe for terminal output.
    pub text: String,
    pub completed: bool,
}

/// Why the row list is empty, when it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The list itself has no tasks.
    NoTasks,
    /// Tasks exist but none match the active filter.
    NoMatches(FilterMode),
}

/// Frontend-agnostic projection of the current list under a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    pub rows: Vec<TaskRow>,
    pub stats: TaskStats,
    /// True when at least one task is completed, i.e. when a
    /// clear-completed control is worth offering.
    pub show_clear_completed: bool,
    pub empty: Option<EmptyState>,
}

/// Builds the view-model for `tasks` under `mode`. Pure function.
pub fn render(tasks: &[Task], mode: FilterMode) -> TaskListView {
    let rows: Vec<TaskRow> = tasks
        .iter()
        .filter(|task| mode.matches(task))
        .map(|task| TaskRow {
            id: task.id,
            text: display_text(&task.text),
            completed: task.completed,
        })
        .collect();

    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let stats = TaskStats {
        total,
        completed,
        pending: total - completed,
    };

    let empty = if tasks.is_empty() {
        Some(EmptyState::NoTasks)
    } else if rows.is_empty() {
        Some(EmptyState::NoMatches(mode))
    } else {
        None
    };

    TaskListView {
        rows,
        stats,
        show_clear_completed: completed > 0,
        empty,
    }
}

/// Replaces control characters and collapses whitespace runs so one task is
/// always one display line.
fn display_text(raw: &str) -> String {
    let widened: String = raw
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();
    WHITESPACE_RE.replace_all(widened.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::{display_text, render, EmptyState};
    use crate::model::task::{FilterMode, Task};

    fn sample(texts: &[(&str, bool)]) -> Vec<Task> {
        texts
            .iter()
            .map(|(text, completed)| {
                let mut task = Task::new(*text).unwrap();
                task.completed = *completed;
                task
            })
            .collect()
    }

    #[test]
    fn display_text_flattens_control_characters_and_runs() {
        assert_eq!(display_text("a\nb"), "a b");
        assert_eq!(display_text("  spaced \t out  "), "spaced out");
        assert_eq!(display_text("bell\u{7}ring"), "bell ring");
    }

    #[test]
    fn empty_list_renders_no_tasks_state() {
        let view = render(&[], FilterMode::All);
        assert_eq!(view.empty, Some(EmptyState::NoTasks));
        assert!(view.rows.is_empty());
        assert!(!view.show_clear_completed);
    }

    #[test]
    fn unmatched_filter_renders_no_matches_state() {
        let tasks = sample(&[("only pending", false)]);
        let view = render(&tasks, FilterMode::Completed);
        assert_eq!(view.empty, Some(EmptyState::NoMatches(FilterMode::Completed)));
        assert_eq!(view.stats.total, 1);
    }

    #[test]
    fn clear_completed_control_shows_only_with_completed_tasks() {
        let pending_only = sample(&[("a", false)]);
        assert!(!render(&pending_only, FilterMode::All).show_clear_completed);

        let mixed = sample(&[("a", false), ("b", true)]);
        let view = render(&mixed, FilterMode::All);
        assert!(view.show_clear_completed);
        assert_eq!(view.rows.len(), 2);
        assert!(view.empty.is_none());
    }
}
