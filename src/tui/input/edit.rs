use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::codec::parse_date;
use crate::tui::app::{App, EditState, InputField, Mode};

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => finish(app),
        KeyCode::Enter => commit(app),
        KeyCode::Tab | KeyCode::BackTab => {
            if app.mode == Mode::Add {
                app.edit.field = match app.edit.field {
                    InputField::Text => InputField::Due,
                    InputField::Due => InputField::Text,
                };
            }
        }
        KeyCode::Backspace => {
            app.edit.field_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.edit.field_mut().push(c);
        }
        _ => {}
    }
}

fn commit(app: &mut App) {
    match app.mode {
        Mode::Add => {
            let due = match parse_due(&app.edit.due) {
                Ok(due) => due,
                Err(msg) => {
                    app.status = Some(msg);
                    return;
                }
            };
            // A rejected add leaves the input open; the warning is queued
            if let Ok(id) = app.session.add_task(&app.edit.text, due) {
                finish(app);
                app.select(id);
            }
        }
        Mode::Edit(id) => {
            if app.session.edit_task(id, &app.edit.text).is_ok() {
                finish(app);
            }
        }
        Mode::Navigate => {}
    }
}

fn finish(app: &mut App) {
    app.edit = EditState::default();
    app.mode = Mode::Navigate;
}

fn parse_due(input: &str) -> Result<Option<NaiveDate>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    parse_date(input)
        .map(Some)
        .ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", input))
}
