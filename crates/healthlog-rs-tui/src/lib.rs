//! Library entry point for the Healthlog TUI.
//!
//! Provides a reusable [`run`] function that launches the Ratatui dashboard
//! against an opened [`RecordStore`].

mod app;
mod dialog;
mod event;
mod ui;

use app::{App, Tab};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use healthlog_rs_config::{FormDefaults, UserConfig};
use healthlog_rs_core::{IdGenerator, RecordStorage, RecordStore};
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::time::Duration;

/// How long to wait for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Configuration for a dashboard session.
#[derive(Debug, Clone, Default)]
pub struct TuiConfig {
    /// Placeholder profile shown in the header.
    pub user: UserConfig,
    /// Values prefilled in the add dialog.
    pub form: FormDefaults,
    /// Storage location shown in the header.
    pub storage_label: String,
}

/// Launch the dashboard against an opened record store.
///
/// The caller is responsible for initializing logging away from stdout
/// (e.g. to a file) before calling `run`.
///
/// # Errors
/// Returns an error if terminal setup, drawing, or reading input fails.
pub fn run<S, G>(store: RecordStore<S, G>, config: TuiConfig) -> anyhow::Result<()>
where
    S: RecordStorage,
    G: IdGenerator,
{
    let mut app = App::new(store, &config);
    info!("starting dashboard (records={})", app.store.len());

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop<S: RecordStorage, G: IdGenerator>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<S, G>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;
        let event = if crossterm::event::poll(POLL_INTERVAL)? {
            AppEvent::from_crossterm(crossterm::event::read()?)
        } else {
            Some(AppEvent::Tick)
        };
        if let Some(event) = event
            && handle_app_event(event, app)
        {
            return Ok(());
        }
    }
}

/// Dispatch a UI event and return true when the app should exit.
fn handle_app_event<S: RecordStorage, G: IdGenerator>(
    event: AppEvent,
    app: &mut App<S, G>,
) -> bool {
    match event {
        AppEvent::Input(key) => handle_input(key, app),
        AppEvent::Resize | AppEvent::Tick => false,
    }
}

/// Handle keyboard input and dispatch actions.
fn handle_input<S: RecordStorage, G: IdGenerator>(key: KeyEvent, app: &mut App<S, G>) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if app.dialog.is_some() {
        handle_dialog_input(key, app);
        return false;
    }
    if app.search_focused {
        handle_search_input(key, app);
        return false;
    }
    handle_default_input(key, app)
}

/// Handle keyboard input while the add/edit dialog is open.
fn handle_dialog_input<S: RecordStorage, G: IdGenerator>(key: KeyEvent, app: &mut App<S, G>) {
    if key.code == KeyCode::Enter {
        app.submit_dialog();
        return;
    }
    if key.code == KeyCode::Esc {
        app.close_dialog();
        app.push_status("cancelled");
        return;
    }
    let Some(dialog) = app.dialog.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => dialog.focus_next(),
        KeyCode::BackTab | KeyCode::Up => dialog.focus_previous(),
        KeyCode::Right => dialog.cycle_category(true),
        KeyCode::Left => dialog.cycle_category(false),
        KeyCode::Backspace => dialog.pop_char(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            dialog.push_char(ch)
        }
        _ => {}
    }
}

/// Handle keyboard input while the search box has focus.
fn handle_search_input<S: RecordStorage, G: IdGenerator>(key: KeyEvent, app: &mut App<S, G>) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.search_focused = false,
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_search_char(ch)
        }
        _ => {}
    }
}

/// Handle keyboard input in the default state.
fn handle_default_input<S: RecordStorage, G: IdGenerator>(
    key: KeyEvent,
    app: &mut App<S, G>,
) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('a') => app.open_add_dialog(),
        _ if app.tab == Tab::Charts => {}
        KeyCode::Char('/') => app.search_focused = true,
        KeyCode::Char(ch @ '1'..='5') => {
            let position = ch.to_digit(10).unwrap_or_default() as usize;
            app.toggle_category_at(position);
        }
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::Enter => app.open_edit_dialog(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        _ => {}
    }
    false
}

/// Prepare the terminal for the TUI.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
