//! Pane and overlay rendering.

use hexspray_core::backend::Backend;
use hexspray_core::decode::TypeTag;
use hexspray_core::registers::{RegisterCell, WidthBucket};
use hexspray_core::session::{DisassemblyView, SessionSummary};
use hexspray_core::types::Address;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, Modal, Notice, PromptKind};

/// Pane color of one register-width bucket; the same palette colors the
/// hex groupings and the spray fields of matching width.
const fn bucket_color(bucket: WidthBucket) -> Color
{
    match bucket {
        WidthBucket::B8 => Color::Red,
        WidthBucket::B16 => Color::LightMagenta,
        WidthBucket::B32 => Color::Magenta,
        WidthBucket::B64 => Color::Blue,
    }
}

/// Field label color in the spray grid, keyed to the width the field
/// reads.
const fn tag_color(tag: TypeTag) -> Color
{
    match tag {
        TypeTag::U8 | TypeTag::I8 => bucket_color(WidthBucket::B8),
        TypeTag::U16 | TypeTag::I16 => bucket_color(WidthBucket::B16),
        TypeTag::U32 | TypeTag::I32 | TypeTag::F32 => bucket_color(WidthBucket::B32),
        TypeTag::U64 | TypeTag::I64 | TypeTag::F64 => bucket_color(WidthBucket::B64),
        TypeTag::Str | TypeTag::Ptr => Color::White,
    }
}

/// `0x` plus the address split into 2/2/4/8-digit groups, one bucket
/// color per group.
fn colored_address(address: Address) -> Vec<Span<'static>>
{
    let groups = address.hex_groups();
    let colors = [
        bucket_color(WidthBucket::B8),
        bucket_color(WidthBucket::B16),
        bucket_color(WidthBucket::B32),
        bucket_color(WidthBucket::B64),
    ];
    let mut spans = vec![Span::styled("0x", Style::default().add_modifier(Modifier::BOLD))];
    for (group, color) in groups.into_iter().zip(colors) {
        spans.push(Span::styled(group, Style::default().fg(color).add_modifier(Modifier::BOLD)));
    }
    spans
}

fn rounded_block(title: &str) -> Block<'_>
{
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

/// Draw the disassembly pane.
pub fn draw_disassembly<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>)
{
    let text = match &app.disassembly {
        DisassemblyView::NotLaunched => Line::from(Span::styled("no process running", Style::default().fg(Color::DarkGray))).into(),
        DisassemblyView::Exited => Line::from(Span::styled("process exited", Style::default().fg(Color::Magenta))).into(),
        DisassemblyView::Unavailable => Line::from(Span::styled("process is not stopped", Style::default().fg(Color::DarkGray))).into(),
        DisassemblyView::Listing(listing) => ratatui::text::Text::from(listing.as_str()),
    };

    let paragraph = Paragraph::new(text).block(rounded_block("disassembly")).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Draw the four register bucket panes, widest first.
pub fn draw_registers<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>)
{
    let columns = Layout::horizontal([
        Constraint::Percentage(34),
        Constraint::Percentage(26),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
    ])
    .split(area);

    for (bucket, column) in WidthBucket::ALL.into_iter().zip(columns.iter()) {
        let lines: Vec<Line> = app.registers.bucket(bucket).iter().map(register_line).collect();
        let paragraph = Paragraph::new(lines).block(rounded_block(bucket.label()));
        frame.render_widget(paragraph, *column);
    }
}

/// One register row; changed values get the emphasis style.
fn register_line(cell: &RegisterCell) -> Line<'_>
{
    let value_style = if cell.changed {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(cell.name.clone(), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(cell.value.clone(), value_style),
    ])
}

/// Draw the inspector: the type-spray grid plus the address readout.
pub fn draw_inspector<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>)
{
    let block = rounded_block("inspector");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1), // address readout
        Constraint::Length(4), // spray grid
        Constraint::Length(1), // deref line
    ])
    .split(inner);

    frame.render_widget(Paragraph::new(address_line(app)), rows[0]);
    draw_spray_grid(frame, rows[1], app);
    frame.render_widget(Paragraph::new(deref_line(app)), rows[2]);
}

/// `expr: 0x…` readout, or the hint before anything was examined.
fn address_line<B: Backend>(app: &App<B>) -> Line<'static>
{
    match &app.inspection {
        Some(inspection) => {
            let mut spans = vec![Span::raw(format!("{}: ", inspection.expression))];
            spans.extend(colored_address(inspection.address));
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            "x: examine an expression",
            Style::default().fg(Color::DarkGray),
        )),
    }
}

/// The 4x3 grid of typed interpretations.
fn draw_spray_grid<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>)
{
    let rows = Layout::vertical([Constraint::Length(1); 4]).split(area);
    for (row_index, row_area) in rows.iter().enumerate() {
        let cells = Layout::horizontal([Constraint::Percentage(33), Constraint::Percentage(33), Constraint::Percentage(34)]).split(*row_area);
        for (col_index, cell_area) in cells.iter().enumerate() {
            let tag = TypeTag::ALL[row_index * 3 + col_index];
            frame.render_widget(Paragraph::new(spray_field(app, tag)), *cell_area);
        }
    }
}

fn spray_field<B: Backend>(app: &App<B>, tag: TypeTag) -> Line<'static>
{
    let label = Span::styled(
        format!("{}: ", tag.label()),
        Style::default().fg(tag_color(tag)).add_modifier(Modifier::BOLD),
    );
    let value = match &app.inspection {
        Some(inspection) => inspection.spray.field(tag).display().to_string(),
        None => String::new(),
    };
    Line::from(vec![label, Span::raw(value)])
}

/// The dereferencing status line, including the live-memory readout or
/// the failure indicator.
fn deref_line<B: Backend>(app: &App<B>) -> Line<'static>
{
    let mut spans = vec![Span::styled(
        "dereferencing: ",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )];

    let on = app.dereferencing();
    spans.push(Span::styled(
        if on { "yes" } else { "no" },
        Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
    ));

    if let Some(inspection) = &app.inspection {
        if inspection.deref_failed {
            spans.push(Span::styled("; but dereference failed", Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC)));
        } else if let Some(view) = inspection.memory_view {
            spans.push(Span::raw("; results are from "));
            spans.extend(colored_address(view));
        }
    }

    Line::from(spans)
}

/// Draw the session summary strip: target, process, thread.
pub fn draw_summary<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>)
{
    let columns = Layout::horizontal([Constraint::Percentage(34), Constraint::Percentage(33), Constraint::Percentage(33)]).split(area);

    let target = match &app.summary.target {
        Some(name) => Line::from(vec![
            Span::styled("target ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(name.clone(), Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC)),
        ]),
        None => dim_line("target ", "no target selected"),
    };
    let process = match app.summary.process {
        Some((pid, state)) => Line::from(vec![
            Span::styled("process ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("ID: {pid} is {state}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        ]),
        None => dim_line("process ", "no process running"),
    };
    frame.render_widget(Paragraph::new(target).block(rounded_block("")), columns[0]);
    frame.render_widget(Paragraph::new(process).block(rounded_block("")), columns[1]);
    frame.render_widget(Paragraph::new(thread_line(&app.summary)).block(rounded_block("")), columns[2]);
}

/// The thread cell: the stop description while stopped, "exited" after
/// the process ends, and the not-stopped hint otherwise.
fn thread_line(summary: &SessionSummary) -> Line<'static>
{
    match (&summary.stop_description, summary.process) {
        (Some(reason), _) => Line::from(vec![
            Span::styled("thread ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("at {reason}"), Style::default().fg(Color::Magenta)),
        ]),
        (None, Some((_, "exited"))) => Line::from(vec![
            Span::styled("thread ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("exited", Style::default().fg(Color::Magenta)),
        ]),
        _ => dim_line("thread ", "thread not stopped"),
    }
}

fn dim_line(label: &'static str, text: &'static str) -> Line<'static>
{
    Line::from(vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(text, Style::default().fg(Color::DarkGray)),
    ])
}

/// Draw whichever overlay is open, prompts before notices.
pub fn draw_overlays<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>)
{
    match &app.modal {
        Modal::None => {}
        Modal::Prompt { kind, input } => draw_prompt(frame, area, app, *kind, input),
        Modal::Symbols(symbols) => draw_symbols(frame, area, symbols),
    }

    if let Some(notice) = &app.notice {
        draw_notice(frame, area, notice);
    }
}

fn draw_prompt<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>, kind: PromptKind, input: &str)
{
    // The breakpoint prompt also lists what is already registered.
    let listing: Vec<Line> = if kind == PromptKind::Breakpoint {
        app.breakpoint_rows()
            .into_iter()
            .map(|(id, symbol, locations)| {
                Line::from(vec![
                    Span::styled(format!(" {id}"), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                    Span::raw(": name = "),
                    Span::styled(symbol, Style::default().fg(Color::Green)),
                    Span::raw(", locations = "),
                    Span::styled(locations.to_string(), Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
                ])
            })
            .collect()
    } else {
        Vec::new()
    };

    let height = 5 + u16::try_from(listing.len()).unwrap_or(0);
    let popup = centered_rect(area, 60, height);
    frame.render_widget(Clear, popup);

    let mut lines = listing;
    lines.push(Line::from(Span::styled(kind.title(), Style::default().add_modifier(Modifier::BOLD))));
    if input.is_empty() {
        lines.push(Line::from(Span::styled(kind.placeholder(), Style::default().fg(Color::DarkGray))));
    } else {
        lines.push(Line::from(vec![Span::raw(input.to_string()), Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK))]));
    }

    let paragraph = Paragraph::new(lines).block(rounded_block("")).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

fn draw_symbols(frame: &mut Frame, area: Rect, symbols: &[hexspray_core::backend::SymbolInfo])
{
    let popup = centered_rect(area, 80, area.height.saturating_sub(4));
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from(Span::styled("symbols found in target:", Style::default().add_modifier(Modifier::BOLD)))];
    for symbol in symbols {
        lines.push(Line::from(vec![
            Span::styled(format!(" {}", symbol.id), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(": from "),
            Span::styled(symbol.range.clone(), Style::default().fg(Color::Blue)),
            Span::raw("; "),
            Span::styled(symbol.name.clone(), Style::default().fg(Color::Green)),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(rounded_block("")).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

fn draw_notice(frame: &mut Frame, area: Rect, notice: &Notice)
{
    let popup = centered_rect(area, 50, 5);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(notice.heading, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
        Line::from(Span::raw(notice.message.clone())),
    ];
    let paragraph = Paragraph::new(lines).block(rounded_block("")).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}

/// A centered popup `percent_x` wide and `height` rows tall.
fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect
{
    let width = area.width * percent_x / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}
