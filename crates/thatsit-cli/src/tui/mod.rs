//! Full-screen terminal front end.

pub mod app;
pub mod view;

use std::io::{self, Stderr};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

/// Owns raw mode and the alternate screen for its lifetime.
///
/// Bracketed paste is switched on so a paste arrives as one event and can
/// be refused instead of being replayed as keystrokes.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    active: bool,
}

impl Tui {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(
            io::stderr(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            cursor::Hide
        )?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stderr()))?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> io::Result<()> {
        execute!(io::stderr(), SetTitle(title))
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            io::stderr(),
            DisableBracketedPaste,
            LeaveAlternateScreen,
            cursor::Show
        )?;
        disable_raw_mode()
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
