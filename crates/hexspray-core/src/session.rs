//! # Debug Session State Machine
//!
//! Owns the target/process/thread lifecycle and sequences every action
//! against the blocking engine. This is the only module permitted to call
//! the backend; the register tracker, expression evaluator, type-spray
//! decoder, and breakpoint registry are composed here and never touch the
//! engine themselves (the decoder's pointer field is fetched on their
//! behalf).
//!
//! ## Phases
//!
//! ```text
//! NoTarget → TargetSet → Launched → {Stopped ⇄ Running} → Exited
//! ```
//!
//! `Exited` is not terminal: setting a new target returns the session to
//! `TargetSet`. Because the engine runs synchronously, control never rests
//! in `Running`: a launch, continue, or step blocks until the engine
//! reports stopped or exited, and only then does an update reach the
//! presentation layer.
//!
//! ## Updates, not observation
//!
//! Rather than exposing mutable fields for the UI to watch, every control
//! operation returns a [`SessionUpdate`] message carrying the refreshed
//! disassembly, register snapshot, and summary. The presentation layer
//! renders what it is handed and holds no session state of its own.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::backend::{Backend, ProcessHandle, RunState, SymbolInfo, TargetHandle, ThreadHandle};
use crate::breakpoints::BreakpointRegistry;
use crate::decode::TypeSpray;
use crate::error::{BackendError, SessionResult, StateError, UserInputError, Warning};
use crate::eval;
use crate::registers::{RegisterSnapshot, RegisterTracker};
use crate::types::Address;

/// Where the state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase
{
    /// No target selected yet.
    NoTarget,
    /// A target is loaded; no process has been launched.
    TargetSet,
    /// A process exists but has not started running.
    Launched,
    /// The process is executing. Never observed between operations; the
    /// synchronous engine only returns control at a stop or exit.
    Running,
    /// The process is stopped and inspectable.
    Stopped,
    /// The process has exited. A new target or run resets the session.
    Exited,
}

/// Summary strip state: target, process, and thread, as display facts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary
{
    /// Target display name, if one is set.
    pub target: Option<String>,
    /// Process id and printed state, if a process exists.
    pub process: Option<(u64, &'static str)>,
    /// Stop reason of the selected thread, if stopped.
    pub stop_description: Option<String>,
}

/// What the disassembly pane should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisassemblyView
{
    /// No process has been launched.
    NotLaunched,
    /// The process exited; the pane shows the exited marker.
    Exited,
    /// The process is not stopped, so no frame can be disassembled.
    Unavailable,
    /// Sanitized disassembly of the selected frame.
    Listing(String),
}

/// Refresh message sent to the presentation layer after every control
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate
{
    pub disassembly: DisassemblyView,
    pub registers: RegisterSnapshot,
    pub summary: SessionSummary,
}

/// Outcome of a successful `set_breakpoint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointSet
{
    /// Creation-order id in the registry.
    pub id: u32,
    /// Location count reported by the engine.
    pub location_count: u32,
    /// Advisory raised when the symbol resolved to zero locations.
    pub warning: Option<Warning>,
}

/// Result of one `examine` evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection
{
    /// The expression as the user typed it.
    pub expression: String,
    /// The resolved, validated address.
    pub address: Address,
    /// Whether the bytes came from live memory.
    pub dereferencing: bool,
    /// Set when dereferencing was on and the memory read itself failed;
    /// the spray is blank and a single indicator is shown.
    pub deref_failed: bool,
    /// With dereferencing on, the first 8 bytes of live memory in string
    /// order, for the colored "results are from" readout.
    pub memory_view: Option<Address>,
    /// The typed interpretations.
    pub spray: TypeSpray,
}

/// The debug session: state machine plus composed inspection components.
pub struct Session<B: Backend>
{
    backend: B,
    target: Option<TargetHandle>,
    process: Option<ProcessHandle>,
    thread: Option<ThreadHandle>,
    registry: BreakpointRegistry,
    tracker: RegisterTracker,
    /// Register values of the last stop, for expression substitution.
    register_values: HashMap<String, String>,
    /// Last submitted examine expression, re-run on deref toggle.
    last_expression: Option<String>,
    dereferencing: bool,
    /// Working directory handed to the debuggee at launch.
    cwd: PathBuf,
    /// The most recently computed update, kept so the views stay
    /// retrievable when an operation refreshes but then fails.
    last_view: SessionUpdate,
}

impl<B: Backend> Session<B>
{
    /// Create a session over a backend. The debuggee will be launched with
    /// the session's current working directory.
    pub fn new(backend: B) -> Self
    {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            backend,
            target: None,
            process: None,
            thread: None,
            registry: BreakpointRegistry::new(),
            tracker: RegisterTracker::new(),
            register_values: HashMap::new(),
            last_expression: None,
            dereferencing: false,
            cwd,
            last_view: SessionUpdate {
                disassembly: DisassemblyView::NotLaunched,
                registers: RegisterSnapshot::default(),
                summary: SessionSummary::default(),
            },
        }
    }

    /// Current phase, derived from held handles and the engine's reported
    /// process state.
    #[must_use]
    pub fn phase(&self) -> Phase
    {
        let Some(_) = self.target else {
            return Phase::NoTarget;
        };
        let Some(process) = self.process else {
            return Phase::TargetSet;
        };
        match self.backend.process_state(process) {
            RunState::NotStarted => Phase::Launched,
            RunState::Running => Phase::Running,
            RunState::Stopped => Phase::Stopped,
            RunState::Exited => Phase::Exited,
        }
    }

    /// Whether the examine / deref toggle surface is usable.
    #[must_use]
    pub fn dereferencing(&self) -> bool
    {
        self.dereferencing
    }

    /// The breakpoint registry, for the prompt's listing.
    #[must_use]
    pub fn breakpoints(&self) -> &BreakpointRegistry
    {
        &self.registry
    }

    /// The backend, for engine-level introspection in tests.
    #[must_use]
    pub fn backend(&self) -> &B
    {
        &self.backend
    }

    /// The most recently refreshed views.
    ///
    /// A failed continue still refreshes before reporting its error; this
    /// accessor lets the presentation layer pick up that refresh, since
    /// the `Err` carries no update.
    #[must_use]
    pub fn view(&self) -> SessionUpdate
    {
        self.last_view.clone()
    }

    /// Select a new target executable.
    ///
    /// On success the session drops any live process, resets breakpoints
    /// and the register baseline, and lands in `TargetSet`. On failure
    /// nothing changes.
    ///
    /// # Errors
    ///
    /// - [`UserInputError::EmptyTargetPath`] for an empty path,
    /// - [`BackendError::TargetNotFound`] when the engine rejects it.
    pub fn set_target(&mut self, path: &str) -> SessionResult<SessionUpdate>
    {
        let path = path.trim();
        if path.is_empty() {
            return Err(UserInputError::EmptyTargetPath.into());
        }

        let Some(handle) = self.backend.create_target(path) else {
            warn!(path, "engine could not create target");
            return Err(BackendError::TargetNotFound(path.to_string()).into());
        };

        // A process cannot outlive the target it was launched from.
        if let Some(process) = self.process.take() {
            if let Err(error) = self.backend.destroy_process(process) {
                warn!(%error, "failed to destroy process of replaced target");
            }
        }

        info!(path, "target set");
        self.target = Some(handle);
        self.thread = None;
        self.registry.reset();
        self.tracker.reset();
        self.register_values.clear();
        self.last_expression = None;

        Ok(self.refresh())
    }

    /// Set a breakpoint by symbol name in the target's module.
    ///
    /// # Errors
    ///
    /// - [`StateError::NoTarget`] without a target,
    /// - [`UserInputError::DuplicateBreakpoint`] for a repeated name,
    /// - [`BackendError::BreakpointFailed`] when the engine refuses.
    pub fn set_breakpoint(&mut self, symbol: &str) -> SessionResult<BreakpointSet>
    {
        let target = self.target.ok_or(StateError::NoTarget)?;
        self.registry.check_free(symbol)?;

        let module = self.backend.target_name(target);
        let Some(created) = self.backend.create_breakpoint_by_name(target, symbol, &module) else {
            warn!(symbol, "engine could not create breakpoint");
            return Err(BackendError::BreakpointFailed(symbol.to_string()).into());
        };

        let record = self.registry.register(symbol, &module, created.location_count)?;
        let id = record.id;
        info!(symbol, locations = created.location_count, "breakpoint set");

        let warning = (created.location_count == 0).then(|| Warning::NoLocations {
            symbol: symbol.to_string(),
        });
        Ok(BreakpointSet {
            id,
            location_count: created.location_count,
            warning,
        })
    }

    /// Launch the target and block until it first stops or exits.
    ///
    /// # Errors
    ///
    /// - [`StateError::NoTarget`] without a target,
    /// - [`StateError::ProcessAlreadyLive`] while a process is live,
    /// - [`BackendError::LaunchFailed`] when the engine cannot launch.
    pub fn run(&mut self) -> SessionResult<SessionUpdate>
    {
        let target = self.target.ok_or(StateError::NoTarget)?;
        if self.live_process().is_some() {
            return Err(StateError::ProcessAlreadyLive.into());
        }

        let args: [String; 0] = [];
        let env: [String; 0] = [];
        let cwd = self.cwd.clone();
        let Some(process) = self.backend.launch(target, &args, &env, &cwd) else {
            warn!("engine failed to launch target");
            return Err(BackendError::LaunchFailed.into());
        };

        info!(pid = self.backend.process_id(process), "process launched");
        self.process = Some(process);
        self.thread = self.backend.selected_thread(process);
        Ok(self.refresh())
    }

    /// Resume the process and block until the next stop or exit.
    ///
    /// # Errors
    ///
    /// - [`StateError::NoProcess`] without a live process,
    /// - [`BackendError::ContinueFailed`] when the engine fails; the
    ///   refresh still runs so the panes reflect the engine's view.
    pub fn continue_run(&mut self) -> SessionResult<SessionUpdate>
    {
        let process = self.live_process().ok_or(StateError::NoProcess)?;

        let resumed = self.backend.resume(process);
        // Always refresh afterward, success or not.
        self.thread = self.process.and_then(|p| self.backend.selected_thread(p));
        let update = self.refresh();

        match resumed {
            Some(_) => {
                debug!(phase = ?self.phase(), "continue completed");
                Ok(update)
            }
            None => {
                warn!("engine failed to continue");
                Err(BackendError::ContinueFailed.into())
            }
        }
    }

    /// Execute one instruction on the selected thread.
    ///
    /// `step_over` steps over calls; otherwise steps into them.
    ///
    /// # Errors
    ///
    /// Each unmet precondition reports its own [`StateError`]
    /// (`NoProcess`, `NotStopped`, `NoThread`) without reaching the
    /// engine; engine failures surface as [`BackendError::StepFailed`].
    pub fn step(&mut self, step_over: bool) -> SessionResult<SessionUpdate>
    {
        let process = self.process.ok_or(StateError::NoProcess)?;
        if self.backend.process_state(process) != RunState::Stopped {
            return Err(StateError::NotStopped.into());
        }
        let thread = self.thread.ok_or(StateError::NoThread)?;

        self.backend.step_instruction(thread, step_over)?;
        debug!(step_over, "stepped one instruction");

        self.thread = self.backend.selected_thread(process);
        Ok(self.refresh())
    }

    /// Evaluate an address expression and decode the result.
    ///
    /// Does not change session state beyond remembering the expression for
    /// the dereference toggle.
    ///
    /// # Errors
    ///
    /// - [`StateError::NoProcess`] without a live process,
    /// - the evaluator's [`UserInputError`] variants for bad expressions.
    pub fn examine(&mut self, expression: &str) -> SessionResult<Inspection>
    {
        let process = self.live_process().ok_or(StateError::NoProcess)?;
        let address = eval::evaluate(expression, &self.register_values)?;
        self.last_expression = Some(expression.to_string());
        Ok(self.inspect(process, expression, address))
    }

    /// Flip the dereference flag and re-decode the last expression, if one
    /// was submitted and a process is live.
    ///
    /// # Errors
    ///
    /// Same as [`Session::examine`] when a re-decode runs.
    pub fn toggle_dereference(&mut self) -> SessionResult<Option<Inspection>>
    {
        self.dereferencing = !self.dereferencing;
        debug!(dereferencing = self.dereferencing, "deref toggled");

        let Some(expression) = self.last_expression.clone() else {
            return Ok(None);
        };
        if self.live_process().is_none() {
            return Ok(None);
        }
        self.examine(&expression).map(Some)
    }

    /// All symbols in the target's symbol table.
    ///
    /// # Errors
    ///
    /// [`StateError::NoTarget`] without a target.
    pub fn list_symbols(&self) -> SessionResult<Vec<SymbolInfo>>
    {
        let target = self.target.ok_or(StateError::NoTarget)?;
        Ok(self.backend.symbols(target))
    }

    /// Tear the session down, destroying any process so no debuggee
    /// outlives the session.
    ///
    /// # Errors
    ///
    /// [`BackendError::ProcessDestroy`] if the engine failed to destroy
    /// the process; local handles are cleared regardless.
    pub fn quit(&mut self) -> SessionResult<()>
    {
        self.thread = None;
        if let Some(process) = self.process.take() {
            info!(pid = self.backend.process_id(process), "destroying process on quit");
            self.backend.destroy_process(process)?;
        }
        Ok(())
    }

    /// The process handle, if a process exists and has not exited.
    fn live_process(&self) -> Option<ProcessHandle>
    {
        self.process.filter(|p| self.backend.process_state(*p) != RunState::Exited)
    }

    /// Decode `address` through the spray pipeline, choosing the byte
    /// source by the dereference flag.
    fn inspect(&mut self, process: ProcessHandle, expression: &str, address: Address) -> Inspection
    {
        if self.dereferencing {
            match self.backend.read_memory(process, address.value(), 16) {
                Ok(data) => {
                    let pointer = self.backend.read_pointer(process, address.value());
                    let first: [u8; 8] = data.get(..8).and_then(|s| s.try_into().ok()).unwrap_or_default();
                    Inspection {
                        expression: expression.to_string(),
                        address,
                        dereferencing: true,
                        deref_failed: false,
                        memory_view: Some(Address::new(u64::from_be_bytes(first))),
                        spray: TypeSpray::decode(&data, &pointer),
                    }
                }
                Err(error) => {
                    debug!(%error, "deref read failed");
                    Inspection {
                        expression: expression.to_string(),
                        address,
                        dereferencing: true,
                        deref_failed: true,
                        memory_view: None,
                        spray: TypeSpray::blank(),
                    }
                }
            }
        } else {
            let data = address.literal_bytes();
            let pointer = self.backend.read_pointer(process, address.value());
            Inspection {
                expression: expression.to_string(),
                address,
                dereferencing: false,
                deref_failed: false,
                memory_view: None,
                spray: TypeSpray::decode(&data, &pointer),
            }
        }
    }

    /// Recompute the derived views after a control operation: registers
    /// and diff first, then disassembly, then the summary strip.
    fn refresh(&mut self) -> SessionUpdate
    {
        let frame = self
            .process
            .filter(|p| self.backend.process_state(*p) == RunState::Stopped)
            .and_then(|p| self.backend.selected_thread(p))
            .and_then(|t| self.backend.selected_frame(t));

        let registers = match frame {
            Some(frame) => {
                let pairs = self.backend.registers(frame);
                self.tracker.observe(&pairs)
            }
            None => RegisterSnapshot::default(),
        };
        self.register_values = registers.values();

        let disassembly = match (self.process, frame) {
            (None, _) => DisassemblyView::NotLaunched,
            (Some(process), None) => {
                if self.backend.process_state(process) == RunState::Exited {
                    DisassemblyView::Exited
                } else {
                    DisassemblyView::Unavailable
                }
            }
            (Some(_), Some(frame)) => DisassemblyView::Listing(sanitize_disassembly(&self.backend.disassemble(frame))),
        };

        let update = SessionUpdate {
            disassembly,
            registers,
            summary: self.summary(),
        };
        self.last_view = update.clone();
        update
    }

    /// The summary strip facts.
    fn summary(&self) -> SessionSummary
    {
        let target = self.target.map(|t| self.backend.target_name(t));
        let process = self
            .process
            .map(|p| (self.backend.process_id(p), self.backend.process_state(p).as_str()));
        let stop_description = self.thread.and_then(|t| self.backend.stop_description(t));

        SessionSummary {
            target,
            process,
            stop_description,
        }
    }
}

/// Strip engine control and formatting byte sequences from disassembly
/// text: ANSI escape sequences and control characters other than newline
/// and tab.
fn sanitize_disassembly(text: &str) -> String
{
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI sequence: consume through the final byte.
            if chars.peek() == Some(&'[') {
                chars.next();
                for next in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&next) {
                        break;
                    }
                }
            }
            continue;
        }
        if c.is_control() && c != '\n' && c != '\t' {
            continue;
        }
        output.push(c);
    }

    output
}
