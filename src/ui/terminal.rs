use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::warn;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::app::App;

type Backend = CrosstermBackend<Stdout>;

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user exits. The terminal is restored even when the loop fails.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    restore_on_error(
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen"),
        || {
            let _ = disable_raw_mode();
        },
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = restore_on_error(
        Terminal::new(backend).context("failed to create terminal backend"),
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )?;

    let result = event_loop(&mut terminal, app);
    let cleanup = cleanup_terminal(&mut terminal);
    first_failure(result, cleanup)
}

/// Run `restore` when a setup step failed, then hand the result back.
fn restore_on_error<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

/// A loop failure (such as a failed save) wins over a failure to tear the
/// terminal down; the latter is only logged in that case.
fn first_failure(result: Result<()>, cleanup: Result<()>) -> Result<()> {
    match (result, cleanup) {
        (Err(err), Err(cleanup_err)) => {
            warn!("terminal cleanup also failed: {cleanup_err:#}");
            Err(err)
        }
        (result, cleanup) => result.and(cleanup),
    }
}

fn event_loop(terminal: &mut Terminal<Backend>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
            continue;
        }

        let Event::Key(key_event) = event::read().context("failed to read event")? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return app.quit();
        }

        if app.handle_key(key_event.code)? {
            return Ok(());
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
