use std::io::{stdout, Write};
use std::panic;

use crossterm::{cursor, execute, terminal};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use log::{debug, warn};

use crate::error::{GameError, Result};

/// Holds the terminal in raw mode on the alternate screen with the cursor
/// hidden. Everything is put back when the guard is dropped.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self> {
        let mut out = stdout();

        terminal::enable_raw_mode().map_err(GameError::TerminalUnavailable)?;
        // From here on, a failure must still undo raw mode.
        let guard = TerminalGuard { _private: () };

        execute!(out, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)
            .map_err(GameError::TerminalUnavailable)?;

        debug!("terminal switched to raw mode");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = restore() {
            warn!("failed to restore terminal: {}", err);
        }
        debug!("terminal restored");
    }
}

/// Leaves the alternate screen and turns raw mode off.
pub fn restore() -> std::io::Result<()> {
    let mut out = stdout();
    let screen = execute!(out, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen);
    let raw = terminal::disable_raw_mode();
    out.flush()?;
    screen.and(raw)
}

/// Restores the terminal before the default hook prints the panic message,
/// otherwise the message lands on the alternate screen and is lost.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore();
        default_hook(info);
    }));
}

/// Terminal size as (columns, rows).
pub fn size() -> Result<(u16, u16)> {
    terminal::size().map_err(GameError::TerminalUnavailable)
}
