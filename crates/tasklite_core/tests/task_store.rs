use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use rusqlite::Connection;
use tasklite_core::db::open_db_in_memory;
use tasklite_core::{
    FilterMode, SqliteTaskListRepository, StoreChange, StoreError, TaskId, TaskStore,
};
use uuid::Uuid;

fn open_store(conn: &Connection) -> TaskStore<SqliteTaskListRepository<'_>> {
    TaskStore::open(SqliteTaskListRepository::new(conn))
}

#[test]
fn add_prepends_and_defaults_to_pending() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    store.add("first").unwrap();
    store.add("second").unwrap();
    store.add("third").unwrap();

    let texts: Vec<&str> = store.tasks().iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
    assert!(store.tasks().iter().all(|task| !task.completed));
    assert_eq!(store.stats().total, 3);
}

#[test]
fn add_returns_the_created_task() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let task = store.add("  returned  ").unwrap();
    assert_eq!(task.text, "returned");
    assert_eq!(store.tasks()[0], task);
}

#[test]
fn add_rejects_empty_text_without_state_change() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store.add("keeper").unwrap();

    let err = store.add("   \t ").unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.stats().total, 1);
}

#[test]
fn toggle_is_its_own_inverse() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let id = store.add("flip").unwrap().id;

    assert_eq!(store.toggle(id).unwrap(), Some(true));
    assert_eq!(store.toggle(id).unwrap(), Some(false));
    assert!(!store.tasks()[0].completed);
}

#[test]
fn toggle_unknown_id_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store.add("untouched").unwrap();
    let snapshot = store.tasks().to_vec();

    assert_eq!(store.toggle(Uuid::new_v4()).unwrap(), None);
    assert_eq!(store.tasks(), snapshot.as_slice());
}

#[test]
fn delete_removes_exactly_the_target() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let keep = store.add("keep").unwrap().id;
    let drop = store.add("drop").unwrap().id;

    assert!(store.delete(drop).unwrap());
    assert_eq!(store.stats().total, 1);
    assert!(store.tasks().iter().all(|task| task.id != drop));
    assert_eq!(store.tasks()[0].id, keep);
}

#[test]
fn delete_unknown_id_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store.add("survivor").unwrap();
    let snapshot = store.tasks().to_vec();

    assert!(!store.delete(Uuid::new_v4()).unwrap());
    assert_eq!(store.tasks(), snapshot.as_slice());
}

#[test]
fn clear_completed_removes_exactly_the_completed_subset() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let a = store.add("a").unwrap().id;
    store.add("b").unwrap();
    let c = store.add("c").unwrap().id;
    store.toggle(a).unwrap();
    store.toggle(c).unwrap();

    assert_eq!(store.clear_completed().unwrap(), 2);
    assert_eq!(store.stats().completed, 0);
    assert_eq!(store.stats().total, 1);
    assert_eq!(store.tasks()[0].text, "b");
}

#[test]
fn clear_completed_with_nothing_completed_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store.add("pending").unwrap();

    assert_eq!(store.clear_completed().unwrap(), 0);
    assert_eq!(store.stats().total, 1);
}

#[test]
fn stats_counts_always_sum_to_total() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    for index in 0..5 {
        let id = store.add(format!("task {index}")).unwrap().id;
        if index % 2 == 0 {
            store.toggle(id).unwrap();
        }
        let stats = store.stats();
        assert_eq!(stats.total, stats.completed + stats.pending);
    }

    let stats = store.stats();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.completed, 3);
    assert_eq!(stats.pending, 2);
}

#[test]
fn filters_partition_the_list_and_preserve_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    for index in 0..6 {
        let id = store.add(format!("task {index}")).unwrap().id;
        if index % 2 == 0 {
            store.toggle(id).unwrap();
        }
    }

    let all: Vec<TaskId> = store.filter(FilterMode::All).iter().map(|t| t.id).collect();
    let pending: Vec<TaskId> = store
        .filter(FilterMode::Pending)
        .iter()
        .map(|t| t.id)
        .collect();
    let completed: Vec<TaskId> = store
        .filter(FilterMode::Completed)
        .iter()
        .map(|t| t.id)
        .collect();

    let pending_set: HashSet<TaskId> = pending.iter().copied().collect();
    let completed_set: HashSet<TaskId> = completed.iter().copied().collect();
    let all_set: HashSet<TaskId> = all.iter().copied().collect();

    assert!(pending_set.is_disjoint(&completed_set));
    let union: HashSet<TaskId> = pending_set.union(&completed_set).copied().collect();
    assert_eq!(all_set, union);

    // Subsequences keep the full-list order.
    let positions: Vec<usize> = pending
        .iter()
        .map(|id| all.iter().position(|other| other == id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn change_listener_observes_successful_mutations_only() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let seen: Rc<RefCell<Vec<StoreChange>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.set_change_listener(Box::new(move |change| sink.borrow_mut().push(*change)));

    let id = store.add("watched").unwrap().id;
    store.toggle(id).unwrap();
    store.toggle(Uuid::new_v4()).unwrap();
    store.add(" ").unwrap_err();
    store.clear_completed().unwrap();
    store.delete(Uuid::new_v4()).unwrap();

    assert_eq!(
        seen.borrow().as_slice(),
        &[
            StoreChange::Added(id),
            StoreChange::Toggled(id),
            StoreChange::ClearedCompleted(1),
        ]
    );
}

#[test]
fn buy_milk_scenario_runs_end_to_end() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let task = store.add("Buy milk").unwrap();
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].text, "Buy milk");
    assert!(!store.tasks()[0].completed);

    assert_eq!(store.toggle(task.id).unwrap(), Some(true));
    let stats = store.stats();
    assert_eq!((stats.total, stats.completed, stats.pending), (1, 1, 0));

    assert_eq!(store.clear_completed().unwrap(), 1);
    assert!(store.tasks().is_empty());
}
