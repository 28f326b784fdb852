//! Terminal lifecycle.
//!
//! The terminal is restored on normal exit, on a second Ctrl+C, and on any
//! panic that escapes the render-failure boundary. Panics caught by the
//! boundary leave the terminal alone so the fallback view can be drawn.

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::boundary;

pub type ShellTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Enables raw mode and enters the alternate screen.
///
/// Call `install_panic_hook()` first.
pub fn setup_terminal() -> Result<ShellTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Failed to create terminal")
}

/// Leaves the alternate screen and disables raw mode. Idempotent.
pub fn restore_terminal() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs the process panic hook.
///
/// Panics raised inside the render boundary are recorded for the boundary
/// and not printed. Anything else restores the terminal, then runs the
/// previous hook.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if boundary::capture_panic(panic_info) {
            return;
        }
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
