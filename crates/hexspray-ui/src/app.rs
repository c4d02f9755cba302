//! Application state and key dispatch.
//!
//! The app holds the session plus the last [`SessionUpdate`] the session
//! handed back; the draw code renders only what is stored here. Key
//! handling is strictly modal: an open notice swallows the first key, an
//! open prompt takes text input, and only the base layer dispatches the
//! session bindings.

use crossterm::event::{KeyCode, KeyEvent};
use hexspray_core::backend::{Backend, SymbolInfo};
use hexspray_core::error::{SessionError, Severity, Warning};
use hexspray_core::registers::RegisterSnapshot;
use hexspray_core::session::{DisassemblyView, Inspection, Session, SessionUpdate};
use hexspray_core::session::SessionSummary;
use hexspray_utils::{debug, error};

/// Which value a prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind
{
    /// Path of the executable to set as target.
    Target,
    /// Symbol name to break at.
    Breakpoint,
    /// Address expression to examine.
    Examine,
}

impl PromptKind
{
    /// Prompt heading.
    #[must_use]
    pub const fn title(self) -> &'static str
    {
        match self {
            PromptKind::Target => "input the target executable",
            PromptKind::Breakpoint => "input the name of the symbol to break at",
            PromptKind::Examine => "input the address you want to examine",
        }
    }

    /// Greyed hint shown while the input is empty.
    #[must_use]
    pub const fn placeholder(self) -> &'static str
    {
        match self {
            PromptKind::Target => "name of target executable",
            PromptKind::Breakpoint => "name of symbol to break at",
            PromptKind::Examine => "address to examine in hexadecimal",
        }
    }
}

/// The currently open overlay, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal
{
    None,
    /// Text prompt with its input buffer.
    Prompt
    {
        kind: PromptKind, input: String
    },
    /// Scrollable symbol listing.
    Symbols(Vec<SymbolInfo>),
}

/// A dismissable error or warning notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice
{
    /// Heading: "action failed:" or "warning:".
    pub heading: &'static str,
    pub message: String,
}

impl Notice
{
    fn from_error(error: &SessionError) -> Self
    {
        let heading = match error.severity() {
            Severity::Error => "action failed:",
            Severity::BackendError => "backend failure:",
        };
        Self {
            heading,
            message: error.to_string(),
        }
    }

    fn from_warning(warning: &Warning) -> Self
    {
        Self {
            heading: "warning:",
            message: warning.to_string(),
        }
    }
}

/// Application state
pub struct App<B: Backend>
{
    session: Session<B>,
    /// Whether the application should exit
    pub should_quit: bool,
    /// Last refreshed views from the session.
    pub disassembly: DisassemblyView,
    pub registers: RegisterSnapshot,
    pub summary: SessionSummary,
    /// Last examine result, if any.
    pub inspection: Option<Inspection>,
    /// Open overlay.
    pub modal: Modal,
    /// Pending notice; swallows the next key press.
    pub notice: Option<Notice>,
}

impl<B: Backend> App<B>
{
    /// Wrap a session for interactive use.
    pub fn new(session: Session<B>) -> Self
    {
        Self {
            session,
            should_quit: false,
            disassembly: DisassemblyView::NotLaunched,
            registers: RegisterSnapshot::default(),
            summary: SessionSummary::default(),
            inspection: None,
            modal: Modal::None,
            notice: None,
        }
    }

    /// Whether the session is currently dereferencing in examine mode.
    #[must_use]
    pub fn dereferencing(&self) -> bool
    {
        self.session.dereferencing()
    }

    /// Rows for the breakpoint prompt's listing.
    #[must_use]
    pub fn breakpoint_rows(&self) -> Vec<(u32, String, u32)>
    {
        self.session
            .breakpoints()
            .iter()
            .map(|record| (record.id, record.symbol.clone(), record.location_count))
            .collect()
    }

    /// Handle one key press.
    pub fn handle_key_event(&mut self, key_event: KeyEvent)
    {
        // A notice takes the next key, whatever it is.
        if self.notice.take().is_some() {
            return;
        }

        match std::mem::replace(&mut self.modal, Modal::None) {
            Modal::Prompt { kind, mut input } => match key_event.code {
                KeyCode::Esc => {}
                KeyCode::Enter => self.submit_prompt(kind, &input),
                KeyCode::Backspace => {
                    input.pop();
                    self.modal = Modal::Prompt { kind, input };
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.modal = Modal::Prompt { kind, input };
                }
                _ => {
                    self.modal = Modal::Prompt { kind, input };
                }
            },
            Modal::Symbols(_) => {
                // Any key dismisses the listing.
            }
            Modal::None => self.handle_binding(key_event),
        }
    }

    /// Base-layer key bindings.
    fn handle_binding(&mut self, key_event: KeyEvent)
    {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('t') => {
                self.modal = Modal::Prompt {
                    kind: PromptKind::Target,
                    input: String::new(),
                };
            }
            KeyCode::Char('b') => {
                self.modal = Modal::Prompt {
                    kind: PromptKind::Breakpoint,
                    input: String::new(),
                };
            }
            KeyCode::Char('x') => {
                self.modal = Modal::Prompt {
                    kind: PromptKind::Examine,
                    input: String::new(),
                };
            }
            KeyCode::Char('r') => self.apply_update(|session| session.run()),
            KeyCode::Char('c') => self.apply_update(Session::continue_run),
            KeyCode::Char('s') => self.apply_update(|session| session.step(true)),
            KeyCode::Char('i') => self.apply_update(|session| session.step(false)),
            KeyCode::Char('d') => self.toggle_dereference(),
            KeyCode::Char('y') => self.show_symbols(),
            _ => {}
        }
    }

    /// Dispatch a submitted prompt value.
    fn submit_prompt(&mut self, kind: PromptKind, input: &str)
    {
        if input.trim().is_empty() {
            return;
        }
        match kind {
            PromptKind::Target => self.set_target(input),
            PromptKind::Breakpoint => self.set_breakpoint(input),
            PromptKind::Examine => self.examine(input),
        }
    }

    /// Set the target and refresh the panes.
    pub fn set_target(&mut self, path: &str)
    {
        match self.session.set_target(path) {
            Ok(update) => {
                self.inspection = None;
                self.store_update(update);
            }
            Err(err) => self.report(&err),
        }
    }

    fn set_breakpoint(&mut self, symbol: &str)
    {
        match self.session.set_breakpoint(symbol.trim()) {
            Ok(outcome) => {
                if let Some(warning) = outcome.warning {
                    self.notice = Some(Notice::from_warning(&warning));
                }
            }
            Err(err) => self.report(&err),
        }
    }

    fn examine(&mut self, expression: &str)
    {
        match self.session.examine(expression) {
            Ok(inspection) => self.inspection = Some(inspection),
            Err(err) => self.report(&err),
        }
    }

    fn toggle_dereference(&mut self)
    {
        match self.session.toggle_dereference() {
            Ok(Some(inspection)) => self.inspection = Some(inspection),
            Ok(None) => {}
            Err(err) => self.report(&err),
        }
    }

    fn show_symbols(&mut self)
    {
        match self.session.list_symbols() {
            Ok(symbols) => self.modal = Modal::Symbols(symbols),
            Err(err) => self.report(&err),
        }
    }

    fn quit(&mut self)
    {
        if let Err(err) = self.session.quit() {
            error!(%err, "failed to destroy process on quit");
        }
        self.should_quit = true;
    }

    /// Run a control operation and store its refresh message.
    ///
    /// A failed operation may still have refreshed the session's views
    /// (a failed continue does), so the last view is stored either way;
    /// for operations that never reached a refresh it is unchanged.
    fn apply_update<F>(&mut self, operation: F)
    where
        F: FnOnce(&mut Session<B>) -> hexspray_core::SessionResult<SessionUpdate>,
    {
        match operation(&mut self.session) {
            Ok(update) => self.store_update(update),
            Err(err) => {
                let view = self.session.view();
                self.store_update(view);
                self.report(&err);
            }
        }
    }

    fn store_update(&mut self, update: SessionUpdate)
    {
        self.disassembly = update.disassembly;
        self.registers = update.registers;
        self.summary = update.summary;
    }

    fn report(&mut self, err: &SessionError)
    {
        debug!(%err, "session action rejected");
        self.notice = Some(Notice::from_error(err));
    }
}
