use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::task_ops::InsertPosition;
use crate::tui::app::{App, EditState, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.rows().len().saturating_sub(1);
        }

        KeyCode::Char(' ') => {
            if let Some(id) = app.selected_id() {
                app.session.toggle_task(id);
                app.select(id);
                app.clamp_cursor();
            }
        }
        KeyCode::Char('a') => {
            app.session.drag_end();
            app.edit = EditState::default();
            app.mode = Mode::Add;
        }
        KeyCode::Char('e') | KeyCode::Enter => begin_edit(app),
        KeyCode::Char('d') => delete_or_keep(app, now),
        KeyCode::Char('f') => {
            let next = app.session.filter().next();
            app.session.set_filter(next);
            app.clamp_cursor();
        }
        KeyCode::Char('J') => move_selected(app, true),
        KeyCode::Char('K') => move_selected(app, false),

        KeyCode::Esc => {
            if !app.session.drag_end() {
                app.status = None;
            }
        }
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let count = app.rows().len();
    if count == 0 {
        return;
    }
    app.cursor = app.cursor.saturating_add_signed(delta).min(count - 1);
}

fn begin_edit(app: &mut App) {
    let Some(row) = app.rows().get(app.cursor).map(|r| (r.id, r.text.clone())) else {
        return;
    };
    let (id, text) = row;
    app.session.drag_end();
    app.edit = EditState {
        text,
        ..EditState::default()
    };
    app.mode = Mode::Edit(id);
}

/// `d` starts the fade-out; `d` on a fading row keeps it.
fn delete_or_keep(app: &mut App, now: Instant) {
    let Some(id) = app.selected_id() else {
        return;
    };
    if app.session.is_pending_delete(id) {
        app.session.cancel_delete(id);
    } else {
        app.session.delete_task(id, now);
        app.clamp_cursor();
    }
}

/// Swap the selected task with its displayed neighbour
fn move_selected(app: &mut App, down: bool) {
    let ids: Vec<_> = app.rows().iter().map(|r| r.id).collect();
    let Some(&id) = ids.get(app.cursor) else {
        return;
    };
    let position = if down {
        match ids.get(app.cursor + 1) {
            Some(&next) => InsertPosition::After(next),
            None => return,
        }
    } else {
        match app.cursor.checked_sub(1).and_then(|i| ids.get(i)) {
            Some(&prev) => InsertPosition::Before(prev),
            None => return,
        }
    };
    if let Err(e) = app.session.move_task(id, position) {
        app.status = Some(e.to_string());
    }
    app.select(id);
}
