//! Terminal setup and teardown.

use std::io::{self, Stdout};
use std::panic;

use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

/// Terminal handle for the interactive session.
///
/// Owns raw mode and the alternate screen, and installs a panic hook that
/// restores the terminal before the panic message prints, so a crash never
/// leaves the shell in raw mode.
pub struct Tui
{
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui
{
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization fails.
    pub fn new() -> io::Result<Self>
    {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = Self::restore();
            original_hook(panic_info);
        }));

        Ok(Self { terminal })
    }

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering to the terminal fails.
    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Leave the alternate screen and disable raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be restored.
    pub fn restore() -> io::Result<()>
    {
        execute!(io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Tui
{
    fn drop(&mut self)
    {
        let _ = Self::restore();
    }
}
