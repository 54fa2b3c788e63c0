use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::info;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::config_io::resolve_task_file;
use crate::io::persistence::FileStore;
use crate::model::config::Config;
use crate::model::task::TaskId;
use crate::ops::filter::TaskRow;
use crate::ops::session::{Session, SessionSettings, ViewBuffer};

use super::input;
use super::render;
use super::theme::Theme;

/// Longest the event loop sleeps waiting for input
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task
    Add,
    /// Rewriting an existing task's text
    Edit(TaskId),
}

/// Which input field has focus while adding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputField {
    #[default]
    Text,
    Due,
}

/// Text being typed in Add/Edit mode
#[derive(Debug, Clone, Default)]
pub struct EditState {
    pub text: String,
    /// `YYYY-MM-DD` or empty
    pub due: String,
    pub field: InputField,
}

impl EditState {
    pub fn field_mut(&mut self) -> &mut String {
        match self.field {
            InputField::Text => &mut self.text,
            InputField::Due => &mut self.due,
        }
    }
}

/// Main application state
pub struct App {
    pub session: Session<ViewBuffer>,
    pub mode: Mode,
    pub edit: EditState,
    /// Index into the displayed rows
    pub cursor: usize,
    /// First displayed row drawn at the top of the list area
    pub scroll_offset: usize,
    /// Where the list was last drawn, for mouse hit-testing
    pub list_area: Rect,
    /// Last warning or message, shown in the status row
    pub status: Option<String>,
    pub should_quit: bool,
    pub theme: Theme,
}

impl App {
    pub fn new(session: Session<ViewBuffer>) -> Self {
        let mut app = App {
            session,
            mode: Mode::Navigate,
            edit: EditState::default(),
            cursor: 0,
            scroll_offset: 0,
            list_area: Rect::default(),
            status: None,
            should_quit: false,
            theme: Theme::default(),
        };
        app.collect_warnings();
        app
    }

    /// Rows in drawing order, including an in-flight drag
    pub fn rows(&self) -> Vec<&TaskRow> {
        self.session.displayed_rows()
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.rows().get(self.cursor).map(|r| r.id)
    }

    /// Put the cursor on `id` if it is displayed
    pub fn select(&mut self, id: TaskId) {
        if let Some(idx) = self.rows().iter().position(|r| r.id == id) {
            self.cursor = idx;
        }
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.rows().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    /// Move the latest queued warning into the status row
    pub fn collect_warnings(&mut self) {
        if let Some(warning) = self.session.take_warnings().pop() {
            self.status = Some(warning.to_string());
        }
    }

    /// Commit due deletions and pick up any warnings they raised
    pub fn tick(&mut self, now: Instant) {
        if self.session.tick(now) > 0 {
            self.clamp_cursor();
        }
        self.collect_warnings();
    }

    /// How long the event loop may wait before the next deletion is due
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.session
            .next_deadline()
            .map_or(POLL_INTERVAL, |d| d.saturating_duration_since(now).min(POLL_INTERVAL))
    }
}

pub fn run(file: Option<&Path>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = resolve_task_file(file, config)
        .ok_or("cannot locate a data directory; pass --file or set CHECKLIST_FILE")?;
    info!("opening {}", path.display());
    let session = Session::open(
        Box::new(FileStore::new(path)),
        ViewBuffer::new(),
        SessionSettings::from_config(&config.ui),
    );
    let mut app = App::new(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key, Instant::now());
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
