use crate::error::{Error, Result};
use crate::platform::ShutdownSignal;
use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Stdout, Write};
use std::time::Duration;

pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // Create the guard immediately so Drop will disable raw mode if
        // any subsequent setup step fails.
        let guard = Self { _private: () };

        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        out.execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        out.execute(cursor::Hide).context("hide cursor")?;

        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        // Undo sync output / autowrap / color modes the renderer may have left on.
        let _ = out.write_all(b"\x1b[?2026l\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
}

/// Drains pending terminal events without blocking; quit keys request shutdown.
pub struct TerminalEvents;

impl ShutdownSignal for TerminalEvents {
    fn shutdown_requested(&mut self) -> Result<bool> {
        let mut quit = false;
        while event::poll(Duration::from_millis(0))
            .map_err(|e| Error::platform("poll events", e))?
        {
            match event::read().map_err(|e| Error::platform("read event", e))? {
                Event::Key(k) if k.kind != KeyEventKind::Release => quit |= is_quit_key(&k),
                _ => {}
            }
        }
        Ok(quit)
    }
}

pub fn is_quit_key(k: &KeyEvent) -> bool {
    if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('c')) {
        return true;
    }
    matches!(k.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
}
