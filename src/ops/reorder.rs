//! Drag-to-reorder over a rendered list.
//!
//! Two layers: the committed row order (whatever was last rendered) and,
//! while a drag is in progress, a presentation buffer that the pointer
//! rearranges. The store is only touched on drop, with the buffer's order.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::model::task::TaskId;

/// A rendered row bound to a task, with its height in presenter units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    pub id: TaskId,
    pub height: f32,
}

impl RowSlot {
    pub fn new(id: TaskId, height: f32) -> Self {
        RowSlot { id, height }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        dragged: TaskId,
        order: Vec<RowSlot>,
    },
}

/// Where the dragged row goes: immediately before a row, or after all rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Before(TaskId),
    End,
}

/// Nearest-above-midpoint rule.
///
/// Rows are laid out top to bottom from `origin` in `slots` order. For every
/// row except the dragged one, `offset = pointer_y - top - height / 2`; of
/// the rows with a negative offset (pointer above their midpoint) the one
/// with the largest offset wins. No such row means the end of the list.
pub fn insertion_target(origin: f32, slots: &[RowSlot], dragged: TaskId, pointer_y: f32) -> DropTarget {
    let mut top = origin;
    let mut best: Option<(f32, TaskId)> = None;
    for slot in slots {
        let row_top = top;
        top += slot.height;
        if slot.id == dragged {
            continue;
        }
        let offset = pointer_y - row_top - slot.height / 2.0;
        if offset < 0.0 && best.is_none_or(|(closest, _)| offset > closest) {
            best = Some((offset, slot.id));
        }
    }
    best.map_or(DropTarget::End, |(_, id)| DropTarget::Before(id))
}

/// Fold a reordered subset back into the full order.
///
/// Positions held by ids in `visible` are refilled in `visible`'s order;
/// every other id keeps its position. Ids in `visible` that are not in
/// `full` are ignored.
pub fn merge_visible_order(full: &[TaskId], visible: &[TaskId]) -> Vec<TaskId> {
    let in_full: HashSet<TaskId> = full.iter().copied().collect();
    let mut moved = HashSet::new();
    let sequence: Vec<TaskId> = visible
        .iter()
        .copied()
        .filter(|id| in_full.contains(id) && moved.insert(*id))
        .collect();
    let mut fill = sequence.into_iter();
    full.iter()
        .map(|id| {
            if moved.contains(id) {
                fill.next().unwrap_or(*id)
            } else {
                *id
            }
        })
        .collect()
}

/// Drives one drag gesture at a time: `Idle → Dragging → Idle`.
#[derive(Debug, Clone, Default)]
pub struct ReorderCoordinator {
    origin: f32,
    rows: Vec<RowSlot>,
    state: DragState,
}

impl ReorderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the rows as rendered. Called on every render.
    ///
    /// An in-flight drag survives a re-render as long as its row is still
    /// there: the buffer keeps its order for surviving rows and gains any new
    /// ones at the end. If the dragged row disappeared the drag is dropped.
    pub fn bind(&mut self, origin: f32, rows: impl IntoIterator<Item = RowSlot>) {
        self.origin = origin;
        self.rows = rows.into_iter().collect();

        let rebuilt = match &self.state {
            DragState::Idle => return,
            DragState::Dragging { dragged, order } => {
                if self.rows.iter().any(|r| r.id == *dragged) {
                    let heights: HashMap<TaskId, f32> =
                        self.rows.iter().map(|r| (r.id, r.height)).collect();
                    let mut next: Vec<RowSlot> = order
                        .iter()
                        .filter_map(|s| heights.get(&s.id).map(|&h| RowSlot::new(s.id, h)))
                        .collect();
                    let kept: HashSet<TaskId> = next.iter().map(|s| s.id).collect();
                    next.extend(self.rows.iter().filter(|r| !kept.contains(&r.id)));
                    Some((*dragged, next))
                } else {
                    None
                }
            }
        };

        self.state = match rebuilt {
            Some((dragged, order)) => DragState::Dragging { dragged, order },
            None => {
                debug!("dragged row vanished during re-render, drag cancelled");
                DragState::Idle
            }
        };
    }

    /// Move the list without changing rows (e.g. terminal resize)
    pub fn set_origin(&mut self, origin: f32) {
        self.origin = origin;
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged(&self) -> Option<TaskId> {
        match &self.state {
            DragState::Dragging { dragged, .. } => Some(*dragged),
            DragState::Idle => None,
        }
    }

    fn slots(&self) -> &[RowSlot] {
        match &self.state {
            DragState::Dragging { order, .. } => order,
            DragState::Idle => &self.rows,
        }
    }

    /// Row ids in the order they should currently be drawn
    pub fn presentation(&self) -> Vec<TaskId> {
        self.slots().iter().map(|s| s.id).collect()
    }

    /// The row under `y` in the current presentation
    pub fn row_at(&self, y: f32) -> Option<TaskId> {
        let mut top = self.origin;
        for slot in self.slots() {
            if y >= top && y < top + slot.height {
                return Some(slot.id);
            }
            top += slot.height;
        }
        None
    }

    /// Begin dragging a row. Ignored if a drag is already in progress or the
    /// row is not rendered.
    pub fn drag_start(&mut self, id: TaskId) -> bool {
        if self.is_dragging() {
            debug!("drag start on {} ignored: a drag is already active", id);
            return false;
        }
        if !self.rows.iter().any(|r| r.id == id) {
            return false;
        }
        debug!("drag start {}", id);
        self.state = DragState::Dragging {
            dragged: id,
            order: self.rows.clone(),
        };
        true
    }

    /// Reposition the dragged row for a pointer at `pointer_y`. Purely
    /// presentational. Returns whether the presentation order changed.
    pub fn drag_over(&mut self, pointer_y: f32) -> bool {
        let origin = self.origin;
        let DragState::Dragging { dragged, order } = &mut self.state else {
            return false;
        };
        let Some(from) = order.iter().position(|s| s.id == *dragged) else {
            return false;
        };

        let target = insertion_target(origin, order.as_slice(), *dragged, pointer_y);
        let before: Vec<TaskId> = order.iter().map(|s| s.id).collect();
        let slot = order.remove(from);
        let to = match target {
            DropTarget::Before(id) => order.iter().position(|s| s.id == id).unwrap_or(order.len()),
            DropTarget::End => order.len(),
        };
        order.insert(to, slot);

        let changed = order.iter().map(|s| s.id).ne(before.iter().copied());
        if changed {
            debug!("drag over y={} -> {:?}", pointer_y, target);
        }
        changed
    }

    /// Finish the gesture. Returns the presentation order if it differs from
    /// the committed one; the caller reconciles it into the store.
    pub fn drop(&mut self) -> Option<Vec<TaskId>> {
        let DragState::Dragging { order, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        let order: Vec<TaskId> = order.iter().map(|s| s.id).collect();
        let committed: Vec<TaskId> = self.rows.iter().map(|s| s.id).collect();
        debug!("drop, order changed: {}", order != committed);
        (order != committed).then_some(order)
    }

    /// Abandon the gesture. Presentation reverts to the committed order.
    pub fn drag_end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            debug!("drag abandoned");
        }
        self.state = DragState::Idle;
        was_dragging
    }
}
