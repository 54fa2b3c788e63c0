use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::tui::app::{App, Mode};

/// Press on a row starts a drag, motion reorders the presentation, release
/// inside the list commits and release outside abandons.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Navigate {
        // A release still ends a drag begun before the mode changed
        if matches!(mouse.kind, MouseEventKind::Up(_)) {
            app.session.drag_end();
        }
        return;
    }
    let inside = contains(app.list_area, mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !inside {
                return;
            }
            if let Some(id) = app.session.row_at(f32::from(mouse.row)) {
                app.select(id);
                app.session.drag_start(id);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(y) = pointer_y(app, mouse.row) {
                app.session.drag_over(y);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(id) = app.session.dragged() else {
                return;
            };
            if inside {
                app.session.drop();
            } else {
                app.session.drag_end();
            }
            app.select(id);
            app.collect_warnings();
        }
        MouseEventKind::ScrollDown => {
            app.cursor = (app.cursor + 1).min(app.rows().len().saturating_sub(1));
        }
        MouseEventKind::ScrollUp => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        _ => {}
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

/// Map a terminal row to a pointer position for the reorder rule.
///
/// Rows are one cell tall, so a cell's top edge sits above its midpoint
/// (the dragged row lands before it) while its bottom edge is past it (the
/// dragged row lands after it). Moving up uses the top edge, moving down
/// the bottom edge, so hovering a row always takes its place.
fn pointer_y(app: &App, row: u16) -> Option<f32> {
    let dragged = app.session.dragged()?;
    let index = app.rows().iter().position(|r| r.id == dragged)?;
    let dragged_top = i64::from(app.list_area.y) + index as i64 - app.scroll_offset as i64;
    let y = f32::from(row);
    Some(if i64::from(row) > dragged_top { y + 1.0 } else { y })
}
