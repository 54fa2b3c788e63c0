use std::time::Duration;

use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

use crate::io::persistence::MemoryStore;
use crate::ops::session::{Session, SessionSettings, ViewBuffer};
use crate::tui::app::App;

/// App over an in-memory store holding `texts`, with "today" pinned to
/// 2024-01-10 and a 300ms delete delay.
pub fn test_app(texts: &[&str]) -> App {
    let settings = SessionSettings {
        delete_delay: Duration::from_millis(300),
        ..SessionSettings::default()
    };
    let mut session = Session::open(Box::new(MemoryStore::new()), ViewBuffer::new(), settings);
    session.set_today(NaiveDate::from_ymd_opt(2024, 1, 10));
    for text in texts {
        session.add_task(text, None).unwrap();
    }
    App::new(session)
}

/// Draw the whole app into an in-memory terminal and return its buffer.
pub fn render_buffer(app: &mut App, w: u16, h: u16) -> Buffer {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| crate::tui::render::render(frame, app))
        .unwrap();
    terminal.backend().buffer().clone()
}

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    let buf = render_buffer(app, w, h);
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}
