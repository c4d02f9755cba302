//! # Backend Trait
//!
//! The interface to the native debugging engine.
//!
//! The session state machine drives the engine exclusively through this
//! trait, in synchronous mode: `launch`, `resume`, and `step_instruction`
//! block the calling thread until the engine reports a new stable state
//! (stopped or exited). There is no event channel to reconcile; whatever
//! the engine says when the call returns *is* the state.
//!
//! ## Handles
//!
//! Engine objects (targets, processes, threads, frames) are represented by
//! opaque `Copy` handles rather than borrowed engine structs. A handle is
//! only meaningful to the backend that issued it; the session never
//! inspects one. Engine calls that can come back empty return `Option`,
//! so validity is an explicit presence check, never a truthiness test on
//! a half-initialized object.
//!
//! ## Implementations
//!
//! Native engine bindings plug in through [`create_backend`]. The crate
//! ships [`scripted::ScriptedBackend`], a deterministic in-memory engine
//! used by the test suite and by the CLI's demo mode.

pub mod scripted;

use std::path::Path;

use crate::error::BackendError;

/// Opaque handle to a loaded executable inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle(pub u64);

/// Opaque handle to a launched process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessHandle(pub u64);

/// Opaque handle to a thread within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadHandle(pub u64);

/// Opaque handle to a stack frame within a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Run state of a launched process, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState
{
    /// Launched but not yet running.
    NotStarted,
    /// Executing; control does not return to the caller in this state.
    Running,
    /// Stopped at a breakpoint, step boundary, or signal.
    Stopped,
    /// The process has exited.
    Exited,
}

impl RunState
{
    /// Lowercase state word used in the session summary.
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            RunState::NotStarted => "not started",
            RunState::Running => "running",
            RunState::Stopped => "stopped",
            RunState::Exited => "exited",
        }
    }
}

/// Result of creating a breakpoint inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakpointInfo
{
    /// How many concrete locations the symbol resolved to. Zero is legal
    /// (the breakpoint stays pending) and surfaces as a warning.
    pub location_count: u32,
}

/// One symbol descriptor from the target's symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo
{
    /// Engine-assigned symbol id.
    pub id: u64,
    /// Printed address range of the symbol.
    pub range: String,
    /// Symbol name as found in the table (not demangled).
    pub name: String,
}

/// Synchronous debugging engine interface.
///
/// All control operations block until the engine reports a stable state.
/// The trait is object-safe; the session owns a `Box<dyn Backend>`.
pub trait Backend
{
    /// Create a target for the executable at `path`.
    ///
    /// Returns `None` if the engine cannot load the executable.
    fn create_target(&mut self, path: &str) -> Option<TargetHandle>;

    /// Display name (file name) of a target.
    fn target_name(&self, target: TargetHandle) -> String;

    /// Create a breakpoint by symbol name in the given module.
    ///
    /// Returns `None` on engine failure. A successful result may still
    /// carry `location_count == 0` if the symbol resolved nowhere yet.
    fn create_breakpoint_by_name(&mut self, target: TargetHandle, symbol: &str, module: &str) -> Option<BreakpointInfo>;

    /// Launch the target and block until it first stops or exits.
    ///
    /// `cwd` is the working directory for the debuggee.
    fn launch(&mut self, target: TargetHandle, args: &[String], env: &[String], cwd: &Path) -> Option<ProcessHandle>;

    /// Resume the process and block until it stops again or exits.
    fn resume(&mut self, process: ProcessHandle) -> Option<ProcessHandle>;

    /// Current run state of the process.
    fn process_state(&self, process: ProcessHandle) -> RunState;

    /// OS process id of the debuggee.
    fn process_id(&self, process: ProcessHandle) -> u64;

    /// The engine's currently selected thread, if any.
    fn selected_thread(&self, process: ProcessHandle) -> Option<ThreadHandle>;

    /// Human-readable stop reason for a thread, if stopped.
    fn stop_description(&self, thread: ThreadHandle) -> Option<String>;

    /// Execute exactly one instruction on the thread, stepping over calls
    /// when `step_over` is set, and block until the step completes.
    fn step_instruction(&mut self, thread: ThreadHandle, step_over: bool) -> Result<(), BackendError>;

    /// The thread's currently selected frame, if any.
    fn selected_frame(&self, thread: ThreadHandle) -> Option<FrameHandle>;

    /// Disassembly text for the frame's function, as printed by the
    /// engine. May contain engine control/formatting byte sequences; the
    /// session strips those before display.
    fn disassemble(&self, frame: FrameHandle) -> String;

    /// The general-purpose register group for the frame, as
    /// `(name, printed hex value)` pairs in engine iteration order.
    fn registers(&self, frame: FrameHandle) -> Vec<(String, String)>;

    /// Read `len` bytes of process memory at `address`.
    fn read_memory(&mut self, process: ProcessHandle, address: u64, len: usize) -> Result<Vec<u8>, BackendError>;

    /// Treat `address` as a pointer and read one pointer-width value
    /// through it.
    fn read_pointer(&mut self, process: ProcessHandle, address: u64) -> Result<u64, BackendError>;

    /// All symbol descriptors in the target's symbol table.
    fn symbols(&self, target: TargetHandle) -> Vec<SymbolInfo>;

    /// Destroy the process, killing the debuggee if it is still alive.
    ///
    /// Called on session quit so no child process outlives the session.
    fn destroy_process(&mut self, process: ProcessHandle) -> Result<(), BackendError>;
}

impl<B: Backend + ?Sized> Backend for Box<B>
{
    fn create_target(&mut self, path: &str) -> Option<TargetHandle>
    {
        (**self).create_target(path)
    }

    fn target_name(&self, target: TargetHandle) -> String
    {
        (**self).target_name(target)
    }

    fn create_breakpoint_by_name(&mut self, target: TargetHandle, symbol: &str, module: &str) -> Option<BreakpointInfo>
    {
        (**self).create_breakpoint_by_name(target, symbol, module)
    }

    fn launch(&mut self, target: TargetHandle, args: &[String], env: &[String], cwd: &Path) -> Option<ProcessHandle>
    {
        (**self).launch(target, args, env, cwd)
    }

    fn resume(&mut self, process: ProcessHandle) -> Option<ProcessHandle>
    {
        (**self).resume(process)
    }

    fn process_state(&self, process: ProcessHandle) -> RunState
    {
        (**self).process_state(process)
    }

    fn process_id(&self, process: ProcessHandle) -> u64
    {
        (**self).process_id(process)
    }

    fn selected_thread(&self, process: ProcessHandle) -> Option<ThreadHandle>
    {
        (**self).selected_thread(process)
    }

    fn stop_description(&self, thread: ThreadHandle) -> Option<String>
    {
        (**self).stop_description(thread)
    }

    fn step_instruction(&mut self, thread: ThreadHandle, step_over: bool) -> Result<(), BackendError>
    {
        (**self).step_instruction(thread, step_over)
    }

    fn selected_frame(&self, thread: ThreadHandle) -> Option<FrameHandle>
    {
        (**self).selected_frame(thread)
    }

    fn disassemble(&self, frame: FrameHandle) -> String
    {
        (**self).disassemble(frame)
    }

    fn registers(&self, frame: FrameHandle) -> Vec<(String, String)>
    {
        (**self).registers(frame)
    }

    fn read_memory(&mut self, process: ProcessHandle, address: u64, len: usize) -> Result<Vec<u8>, BackendError>
    {
        (**self).read_memory(process, address, len)
    }

    fn read_pointer(&mut self, process: ProcessHandle, address: u64) -> Result<u64, BackendError>
    {
        (**self).read_pointer(process, address)
    }

    fn symbols(&self, target: TargetHandle) -> Vec<SymbolInfo>
    {
        (**self).symbols(target)
    }

    fn destroy_process(&mut self, process: ProcessHandle) -> Result<(), BackendError>
    {
        (**self).destroy_process(process)
    }
}

/// Construct a backend by engine name.
///
/// `"scripted"` yields the deterministic in-memory engine with its default
/// demo script. Native engine bindings register here; any other name
/// reports [`BackendError::EngineUnavailable`], which the CLI maps to its
/// backend-initialization exit code.
///
/// # Errors
///
/// Returns `EngineUnavailable` when no engine with that name is compiled
/// into this build.
pub fn create_backend(engine: &str) -> Result<Box<dyn Backend>, BackendError>
{
    match engine {
        "scripted" => Ok(Box::new(scripted::ScriptedBackend::demo())),
        other => Err(BackendError::EngineUnavailable(other.to_string())),
    }
}
