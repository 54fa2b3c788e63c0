mod edit;
mod mouse;
mod navigate;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key, now),
        Mode::Add | Mode::Edit(_) => edit::handle_edit(app, key),
    }
    app.collect_warnings();
}

/// Some terminals report Shift+j as `j` with SHIFT; fold that into `J`.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::FilterMode;
    use crate::tui::render::test_helpers::test_app;
    use pretty_assertions::assert_eq;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn texts(app: &App) -> Vec<String> {
        app.rows().iter().map(|r| r.text.clone()).collect()
    }

    #[test]
    fn add_with_due_date() {
        let mut app = test_app(&[]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Add);
        type_str(&mut app, "Pay rent");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2024-01-05");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(texts(&app), vec!["Pay rent"]);
        assert!(app.rows()[0].urgent);
    }

    #[test]
    fn add_blank_text_stays_in_add_mode_with_warning() {
        let mut app = test_app(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Add);
        assert_eq!(app.status.as_deref(), Some("task text cannot be empty"));
        assert!(app.session.store().is_empty());
    }

    #[test]
    fn add_rejects_bad_date() {
        let mut app = test_app(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "x");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "soon");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Add);
        assert!(app.session.store().is_empty());
    }

    #[test]
    fn esc_cancels_input() {
        let mut app = test_app(&["a"]);
        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.mode, Mode::Edit(_)));
        assert_eq!(app.edit.text, "a");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(texts(&app), vec!["a"]);
    }

    #[test]
    fn edit_replaces_text() {
        let mut app = test_app(&["old"]);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "new");
        press(&mut app, KeyCode::Enter);
        assert_eq!(texts(&app), vec!["new"]);
    }

    #[test]
    fn space_toggles_and_f_cycles_filter() {
        let mut app = test_app(&["a", "b"]);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.rows()[0].completed);

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.session.filter(), FilterMode::Pending);
        assert_eq!(texts(&app), vec!["b"]);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(texts(&app), vec!["a"]);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.session.filter(), FilterMode::All);
    }

    #[test]
    fn d_marks_pending_and_second_d_keeps_row() {
        let mut app = test_app(&["a"]);
        let id = app.selected_id().unwrap();
        press(&mut app, KeyCode::Char('d'));
        assert!(app.session.is_pending_delete(id));
        press(&mut app, KeyCode::Char('d'));
        assert!(!app.session.is_pending_delete(id));
        assert_eq!(texts(&app), vec!["a"]);
    }

    #[test]
    fn shift_j_and_k_move_selected_task() {
        let mut app = test_app(&["a", "b", "c"]);
        press(&mut app, KeyCode::Char('J'));
        assert_eq!(texts(&app), vec!["b", "a", "c"]);
        assert_eq!(app.cursor, 1);

        // Shift reported as a modifier on a lowercase char
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::SHIFT),
            Instant::now(),
        );
        assert_eq!(texts(&app), vec!["b", "c", "a"]);

        press(&mut app, KeyCode::Char('K'));
        press(&mut app, KeyCode::Char('K'));
        assert_eq!(texts(&app), vec!["a", "b", "c"]);
        assert_eq!(app.cursor, 0);

        // Already at the top
        press(&mut app, KeyCode::Char('K'));
        assert_eq!(texts(&app), vec!["a", "b", "c"]);
    }

    #[test]
    fn j_and_k_stay_in_bounds() {
        let mut app = test_app(&["a", "b"]);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn q_quits() {
        let mut app = test_app(&[]);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
