//! End-to-end behavior of the task list through the public API: store
//! mutations, filtering, drag reordering and the render cycle.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use checklist::io::persistence::{MemoryStore, PersistenceAdapter, StorageError};
use checklist::model::task::{FilterMode, Task, TaskId};
use checklist::ops::filter::{build_view, project};
use checklist::ops::session::{Session, SessionSettings, ViewBuffer};
use checklist::ops::task_ops::{TaskStore, ValidationError};
use pretty_assertions::assert_eq;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn open_store() -> TaskStore {
    TaskStore::open(Box::new(MemoryStore::new())).into_value()
}

fn texts(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.text.as_str()).collect()
}

fn session(delay_ms: u64) -> Session<ViewBuffer> {
    let settings = SessionSettings {
        delete_delay: Duration::from_millis(delay_ms),
        ..SessionSettings::default()
    };
    let mut s = Session::open(Box::new(MemoryStore::new()), ViewBuffer::new(), settings);
    s.set_today(Some(date("2024-01-10")));
    s
}

#[test]
fn add_appends_pending_tasks_in_order() {
    let mut store = open_store();
    store.add("Buy milk", None).unwrap().into_value();
    store
        .add("Call bank", Some(date("2024-01-01")))
        .unwrap()
        .into_value();

    let snapshot = store.snapshot();
    assert_eq!(texts(&snapshot), vec!["Buy milk", "Call bank"]);
    assert!(snapshot.iter().all(|t| !t.completed));
    assert_eq!(snapshot[1].due_date, Some(date("2024-01-01")));
}

#[test]
fn filter_projects_by_completion() {
    let mut store = open_store();
    let a = store.add("A", None).unwrap().into_value();
    let b = store.add("B", None).unwrap().into_value();
    store.toggle_completed(b).into_value();

    let ids = |mode| -> Vec<TaskId> { project(store.tasks(), mode).iter().map(|t| t.id).collect() };
    assert_eq!(ids(FilterMode::Pending), vec![a]);
    assert_eq!(ids(FilterMode::Completed), vec![b]);
    assert_eq!(ids(FilterMode::All), vec![a, b]);
}

#[test]
fn drag_second_row_above_first_reorders_store() {
    let mut s = session(0);
    let a = s.add_task("A", None).unwrap();
    let b = s.add_task("B", None).unwrap();
    s.set_list_origin(0.0);

    assert!(s.drag_start(b));
    // Above A's midpoint
    s.drag_over(0.1);
    assert!(s.drop());

    assert_eq!(s.store().ids(), vec![b, a]);
    assert_eq!(s.renderer().view().ids(), vec![b, a]);
}

#[test]
fn deleting_last_task_shows_empty_state_only_for_all() {
    let mut s = session(0);
    let a = s.add_task("A", None).unwrap();
    s.delete_task(a, Instant::now());

    assert!(s.store().is_empty());
    assert!(s.renderer().view().show_empty_state);
    s.set_filter(FilterMode::Pending);
    assert!(!s.renderer().view().show_empty_state);
    s.set_filter(FilterMode::Completed);
    assert!(!s.renderer().view().show_empty_state);
}

#[test]
fn blank_text_is_rejected_without_side_effects() {
    let mut store = open_store();
    let id = store.add("keep", None).unwrap().into_value();
    let before = store.snapshot();

    assert_eq!(store.add("", None).err(), Some(ValidationError::EmptyText));
    assert_eq!(store.add("   ", None).err(), Some(ValidationError::EmptyText));
    assert_eq!(store.edit(id, "").err(), Some(ValidationError::EmptyText));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn reorder_keeps_exactly_the_same_tasks() {
    let mut store = open_store();
    let ids: Vec<TaskId> = ["a", "b", "c", "d"]
        .iter()
        .map(|t| store.add(t, None).unwrap().into_value())
        .collect();

    // Missing ids, unknown ids and repeats
    store.reorder(&[ids[3], TaskId(999), ids[1], ids[3]]).into_value();
    assert_eq!(store.ids(), vec![ids[3], ids[1], ids[0], ids[2]]);

    store.reorder(&[]).into_value();
    let mut sorted = store.ids();
    sorted.sort();
    assert_eq!(sorted, ids);
}

#[test]
fn double_toggle_restores_state() {
    let mut store = open_store();
    let id = store.add("a", None).unwrap().into_value();
    store.toggle_completed(id).into_value();
    store.toggle_completed(id).into_value();
    assert!(!store.get(id).unwrap().completed);
}

#[test]
fn urgency_covers_today_and_overdue_but_never_completed() {
    let today = date("2024-01-10");
    let mut store = open_store();
    store.add("today", Some(today)).unwrap().into_value();
    store.add("overdue", Some(date("2023-12-31"))).unwrap().into_value();
    store.add("tomorrow", Some(date("2024-01-11"))).unwrap().into_value();
    store.add("undated", None).unwrap().into_value();
    let done = store.add("done late", Some(date("2020-01-01"))).unwrap().into_value();
    store.toggle_completed(done).into_value();

    let view = build_view(store.tasks(), FilterMode::All, today, "%d %b %Y");
    let urgent: Vec<bool> = view.rows.iter().map(|r| r.urgent).collect();
    assert_eq!(urgent, vec![true, true, false, false, false]);
}

#[test]
fn identical_text_tasks_stay_distinct() {
    let mut s = session(300);
    let first = s.add_task("same", None).unwrap();
    let second = s.add_task("same", None).unwrap();
    assert_ne!(first, second);

    let _ = s.toggle_task(second);
    let start = Instant::now();
    s.delete_task(first, start);
    s.tick(start + Duration::from_millis(300));

    let remaining = s.store().snapshot();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second);
    assert!(remaining[0].completed);
}

#[test]
fn every_committed_mutation_renders_once() {
    let mut s = session(0);
    let mut expected = s.renderer().renders();
    let mut step = |s: &Session<ViewBuffer>| {
        expected += 1;
        assert_eq!(s.renderer().renders(), expected);
    };

    let a = s.add_task("a", None).unwrap();
    step(&s);
    let b = s.add_task("b", None).unwrap();
    step(&s);
    s.edit_task(a, "a2").unwrap();
    step(&s);
    s.toggle_task(b);
    step(&s);
    s.drag_start(b);
    s.drag_over(0.0);
    s.drop();
    step(&s);
    s.delete_task(a, Instant::now());
    step(&s);
}

struct OfflineStore;

impl PersistenceAdapter for OfflineStore {
    fn load(&mut self) -> Result<Option<Vec<u8>>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn save(&mut self, _bytes: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }
}

#[test]
fn unavailable_storage_degrades_to_in_memory_list() {
    let mut s = Session::open(Box::new(OfflineStore), ViewBuffer::new(), SessionSettings::default());
    assert_eq!(s.take_warnings().len(), 1);

    s.add_task("still works", None).unwrap();
    assert_eq!(s.store().len(), 1);
    let warnings = s.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].to_string().starts_with("could not save tasks"));
}
