//! Presenter-facing render cycle.
//!
//! A `Session` turns presenter intents into store mutations and hands the
//! resulting list view to a [`Renderer`], exactly once per committed
//! mutation. Drag gestures go through the [`ReorderCoordinator`] and reach
//! the store only on drop.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use log::warn;

use crate::io::persistence::PersistenceAdapter;
use crate::model::config::UiConfig;
use crate::model::task::{FilterMode, TaskId};
use crate::ops::filter::{ListView, TaskRow, build_view};
use crate::ops::pending::DeleteQueue;
use crate::ops::reorder::{ReorderCoordinator, RowSlot, merge_visible_order};
use crate::ops::task_ops::{
    InsertPosition, MoveError, Outcome, PersistenceWarning, TaskStore, ValidationError,
};

/// Receives the visible list after every committed change
pub trait Renderer {
    fn render(&mut self, view: &ListView);
}

/// Renderer that keeps the latest view for a presenter to draw from
#[derive(Debug, Default)]
pub struct ViewBuffer {
    view: ListView,
    renders: usize,
}

impl ViewBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    /// How many times `render` has been called
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Renderer for ViewBuffer {
    fn render(&mut self, view: &ListView) {
        self.view = view.clone();
        self.renders += 1;
    }
}

/// Non-fatal problems surfaced to the user
#[derive(Debug, thiserror::Error)]
pub enum Warning {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceWarning),
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub delete_delay: Duration,
    pub date_format: String,
    pub filter: FilterMode,
    /// Height of one rendered row, in the presenter's pointer units
    pub row_height: f32,
}

impl SessionSettings {
    pub fn from_config(ui: &UiConfig) -> Self {
        SessionSettings {
            delete_delay: Duration::from_millis(ui.delete_delay_ms),
            date_format: ui.date_format.clone(),
            filter: ui.default_filter,
            row_height: 1.0,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

pub struct Session<R: Renderer> {
    store: TaskStore,
    filter: FilterMode,
    reorder: ReorderCoordinator,
    deletes: DeleteQueue,
    renderer: R,
    view: ListView,
    date_format: String,
    row_height: f32,
    list_origin: f32,
    today: Option<NaiveDate>,
    warnings: Vec<Warning>,
}

impl<R: Renderer> Session<R> {
    /// Wrap an open store and render the initial view.
    pub fn new(store: TaskStore, renderer: R, settings: SessionSettings) -> Self {
        let mut session = Session {
            store,
            filter: settings.filter,
            reorder: ReorderCoordinator::new(),
            deletes: DeleteQueue::new(settings.delete_delay),
            renderer,
            view: ListView::default(),
            date_format: settings.date_format,
            row_height: settings.row_height,
            list_origin: 0.0,
            today: None,
            warnings: Vec::new(),
        };
        session.render();
        session
    }

    /// Open a store on `adapter`; a load failure becomes a queued warning.
    pub fn open(adapter: Box<dyn PersistenceAdapter>, renderer: R, settings: SessionSettings) -> Self {
        let outcome = TaskStore::open(adapter);
        let warning = outcome.warning;
        let mut session = Self::new(outcome.value, renderer, settings);
        if let Some(w) = warning {
            session.warnings.push(w.into());
        }
        session
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// The last rendered view
    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Pin "today" for urgency. `None` follows the system clock.
    pub fn set_today(&mut self, today: Option<NaiveDate>) {
        self.today = today;
        self.render();
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    pub fn add_task(&mut self, text: &str, due_date: Option<NaiveDate>) -> Result<TaskId, ValidationError> {
        let outcome = self.validated(|store| store.add(text, due_date))?;
        let id = self.absorb(outcome);
        self.render();
        Ok(id)
    }

    /// Toggling a row that is fading out keeps it.
    pub fn toggle_task(&mut self, id: TaskId) -> Option<bool> {
        self.deletes.cancel(id);
        let outcome = self.store.toggle_completed(id);
        let state = self.absorb(outcome);
        self.render();
        state
    }

    /// Editing a row that is fading out keeps it.
    pub fn edit_task(&mut self, id: TaskId, new_text: &str) -> Result<bool, ValidationError> {
        let outcome = self.validated(|store| store.edit(id, new_text))?;
        self.deletes.cancel(id);
        let found = self.absorb(outcome);
        self.render();
        Ok(found)
    }

    pub fn set_due_date(&mut self, id: TaskId, due_date: Option<NaiveDate>) -> bool {
        let outcome = self.store.set_due_date(id, due_date);
        let found = self.absorb(outcome);
        self.render();
        found
    }

    /// Request deletion. The row stays in the list until the fade-out delay
    /// has passed and [`Session::tick`] commits it; with no delay it goes at
    /// once. Returns false for unknown ids and repeat requests.
    pub fn delete_task(&mut self, id: TaskId, now: Instant) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        if self.deletes.delay().is_zero() {
            self.commit_delete(id);
            return true;
        }
        self.deletes.schedule(id, now)
    }

    pub fn cancel_delete(&mut self, id: TaskId) -> bool {
        self.deletes.cancel(id)
    }

    pub fn is_pending_delete(&self, id: TaskId) -> bool {
        self.deletes.is_pending(id)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deletes.next_deadline()
    }

    /// Commit deletions whose delay has run out. Returns how many.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.deletes.due(now);
        for &id in &due {
            self.commit_delete(id);
        }
        due.len()
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
        self.reorder.drag_end();
        self.render();
    }

    pub fn move_task(&mut self, id: TaskId, position: InsertPosition) -> Result<(), MoveError> {
        let outcome = self.store.move_task(id, position)?;
        self.absorb(outcome);
        self.render();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Drag gestures
    // -----------------------------------------------------------------------

    /// Where the first row is drawn, in pointer units
    pub fn set_list_origin(&mut self, origin: f32) {
        self.list_origin = origin;
        self.reorder.set_origin(origin);
    }

    pub fn row_at(&self, y: f32) -> Option<TaskId> {
        self.reorder.row_at(y)
    }

    pub fn dragged(&self) -> Option<TaskId> {
        self.reorder.dragged()
    }

    pub fn drag_start(&mut self, id: TaskId) -> bool {
        self.reorder.drag_start(id)
    }

    pub fn drag_over(&mut self, pointer_y: f32) -> bool {
        self.reorder.drag_over(pointer_y)
    }

    /// Commit the dragged order. Rows hidden by the filter keep their
    /// positions; visible positions take the new visible order.
    pub fn drop(&mut self) -> bool {
        let Some(visible) = self.reorder.drop() else {
            return false;
        };
        let full = merge_visible_order(&self.store.ids(), &visible);
        let outcome = self.store.reorder(&full);
        self.absorb(outcome);
        self.render();
        true
    }

    pub fn drag_end(&mut self) -> bool {
        self.reorder.drag_end()
    }

    /// Visible rows in drawing order, including an in-flight drag
    pub fn displayed_rows(&self) -> Vec<&TaskRow> {
        self.reorder
            .presentation()
            .into_iter()
            .filter_map(|id| self.view.row(id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn commit_delete(&mut self, id: TaskId) {
        let outcome = self.store.delete(id);
        self.absorb(outcome);
        self.render();
    }

    fn validated<T>(
        &mut self,
        op: impl FnOnce(&mut TaskStore) -> Result<Outcome<T>, ValidationError>,
    ) -> Result<Outcome<T>, ValidationError> {
        op(&mut self.store).inspect_err(|e| {
            warn!("{}", e);
            self.warnings.push(Warning::Validation(e.clone()));
        })
    }

    fn absorb<T>(&mut self, outcome: Outcome<T>) -> T {
        if let Some(w) = outcome.warning {
            self.warnings.push(w.into());
        }
        outcome.value
    }

    fn render(&mut self) {
        let view = build_view(self.store.tasks(), self.filter, self.today(), &self.date_format);
        let height = self.row_height;
        self.reorder.bind(
            self.list_origin,
            view.rows.iter().map(|r| RowSlot::new(r.id, height)),
        );
        self.renderer.render(&view);
        self.view = view;
    }
}
