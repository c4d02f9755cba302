//! Frame layout.
//!
//! One draw call renders the whole screen from [`App`] state: the
//! disassembly pane on the left, the four register-width panes on the
//! right, the inspector strip, the session summary, a one-line key help
//! footer, and whichever overlay is open on top.

use hexspray_core::backend::Backend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::widgets;

const HELP_LINE: &str =
    " t:Target  b:Breakpoint  r:Run  c:Continue  s:StepOver  i:StepInto  x:Examine  d:Deref  y:Symbols  q:Quit";

/// Render the full interface for one frame.
pub fn draw<B: Backend>(frame: &mut Frame, app: &App<B>)
{
    let area = frame.area();

    let rows = Layout::vertical([
        Constraint::Min(8),    // disassembly + registers
        Constraint::Length(8), // inspector
        Constraint::Length(3), // summary strip
        Constraint::Length(1), // key help
    ])
    .split(area);

    let main = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(rows[0]);
    widgets::draw_disassembly(frame, main[0], app);
    widgets::draw_registers(frame, main[1], app);

    widgets::draw_inspector(frame, rows[1], app);
    widgets::draw_summary(frame, rows[2], app);

    let footer = Paragraph::new(Line::from(Span::styled(HELP_LINE, Style::default().fg(Color::DarkGray))));
    frame.render_widget(footer, rows[3]);

    widgets::draw_overlays(frame, area, app);
}
