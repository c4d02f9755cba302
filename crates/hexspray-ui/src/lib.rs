//! # hexspray-ui
//!
//! Terminal user interface for the hexspray debugger front-end.
//!
//! This crate renders the session state published by `hexspray-core`
//! (disassembly, width-bucketed registers, the type-spray inspector, and
//! the session summary) and drives the session from single-key
//! bindings plus modal text prompts. The loop is fully synchronous: it
//! blocks on terminal input, and every session call completes before
//! the next frame is drawn.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hexspray_core::backend::create_backend;
//! use hexspray_core::session::Session;
//! use hexspray_ui::run_tui;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = create_backend("scripted")?;
//! let session = Session::new(backend);
//! run_tui(session, None)?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod tui;
pub mod ui;
pub mod widgets;

use crossterm::event::{self, Event, KeyEventKind};
use hexspray_core::backend::Backend;
use hexspray_core::session::Session;
use hexspray_utils::debug;

pub use app::App;
pub use tui::Tui;

/// Run the interface until the user quits.
///
/// Blocks the calling thread. `initial_target` is applied before the
/// first frame, exactly as if the user had entered it at the target
/// prompt; a failure there is surfaced as a notice, not an error
/// return.
pub fn run_tui<B: Backend>(session: Session<B>, initial_target: Option<&str>) -> std::io::Result<()>
{
    let mut tui = Tui::new()?;
    let mut app = App::new(session);

    if let Some(path) = initial_target {
        app.set_target(path);
    }

    while !app.should_quit {
        tui.draw(|frame| ui::draw(frame, &app))?;

        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                app.handle_key_event(key_event);
            }
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
            }
            _ => {}
        }
    }

    Ok(())
}
