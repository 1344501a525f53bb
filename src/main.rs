//! GRIDCALC - Terminal Grid Editor
//!
//! A terminal grid-based data editor with formula support, built in Rust.
//! Cells hold literal text or formulas like =SUM(A1:A3); committed formulas
//! are evaluated once and copied cells get their references shifted
//! relative to the move.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;

mod application;
mod domain;
mod infrastructure;
mod presentation;

use application::App;
use presentation::{InputHandler, render_ui};

/// Entry point for the gridcalc terminal application.
///
/// Sets up the terminal interface, initializes the application state,
/// and runs the main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::default();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Handles terminal rendering and keyboard input processing.
/// Continues running until the user presses 'q' in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, application::AppMode::Normal) => {
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
