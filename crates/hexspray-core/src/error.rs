//! # Error Types
//!
//! The error taxonomy for session operations.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Errors fall into three categories, matching how they are recovered from:
//!
//! 1. **User input errors**: bad expressions, duplicate breakpoint names.
//!    Reported to the user; nothing else happens.
//! 2. **State errors**: an action was issued that the current session phase
//!    does not permit (e.g. stepping without a stopped process). Reported;
//!    no backend call is made.
//! 3. **Backend errors**: the debugging engine refused or failed an
//!    operation. The action simply does not complete.
//!
//! No variant here is fatal: every error leaves the session exactly where it
//! was before the failed action, and the session remains usable.
//!
//! Warnings are deliberately *not* errors. A warning accompanies an action
//! that completed (e.g. a breakpoint that resolved to zero locations), so it
//! travels in the operation's `Ok` outcome, never in `Err`.

use thiserror::Error;

/// User-supplied input was rejected before any backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserInputError
{
    /// The expression contained a character outside the restricted
    /// alphabet `0-9 a-f x + - *` after register substitution.
    #[error("invalid input")]
    InvalidExpression,

    /// The expression survived validation but could not be evaluated to an
    /// integer (malformed syntax, dangling operator, overflow).
    #[error("address parse failure")]
    ParseFailure,

    /// The expression evaluated to a negative value, which cannot name a
    /// memory location.
    #[error("negative address")]
    NegativeAddress,

    /// A breakpoint with this symbol name already exists in the session.
    #[error("breakpoint already set on '{0}'")]
    DuplicateBreakpoint(String),

    /// The target path supplied to `set_target` was empty.
    #[error("target path is empty")]
    EmptyTargetPath,
}

/// The action is invalid for the current session phase.
///
/// Each precondition of the state machine gets a distinct variant so the
/// user is told exactly which prerequisite is missing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError
{
    /// The action requires a target and none is set.
    #[error("no target selected")]
    NoTarget,

    /// The action requires a live process and none is running.
    #[error("no process running")]
    NoProcess,

    /// A process is already live; run again after it exits or set a new
    /// target.
    #[error("a process is already live")]
    ProcessAlreadyLive,

    /// The action requires the process to be stopped.
    #[error("process is not stopped")]
    NotStopped,

    /// The process is stopped but no thread is selected.
    #[error("no thread selected")]
    NoThread,
}

/// The debugging engine reported a failure.
///
/// These map one-for-one onto the nullable / failable results of the
/// backend contract; an absent engine object becomes a distinct variant
/// rather than a truthiness check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError
{
    /// The engine could not create a target for the given path.
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// The engine could not create a breakpoint for the symbol.
    #[error("breakpoint failed for symbol '{0}'")]
    BreakpointFailed(String),

    /// The engine failed to launch the target.
    #[error("launch failed")]
    LaunchFailed,

    /// The engine failed to continue the process.
    #[error("continue failed")]
    ContinueFailed,

    /// The engine failed to single-step the selected thread.
    #[error("step failed")]
    StepFailed,

    /// A memory read at the given address failed.
    #[error("memory read failed at 0x{0:016x}")]
    MemoryRead(u64),

    /// A pointer-width dereference at the given address failed.
    #[error("pointer read failed at 0x{0:016x}")]
    PointerRead(u64),

    /// The engine failed to destroy the live process.
    #[error("failed to destroy process")]
    ProcessDestroy,

    /// No debugging engine with the requested name is compiled in.
    #[error("debugging engine unavailable: {0}")]
    EngineUnavailable(String),
}

/// Umbrella error for all session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError
{
    #[error("invalid input: {0}")]
    User(#[from] UserInputError),

    #[error("invalid action: {0}")]
    State(#[from] StateError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl SessionError
{
    /// Display severity for the presentation layer. Severity never changes
    /// recovery behavior; the state machine is untouched either way.
    #[must_use]
    pub const fn severity(&self) -> Severity
    {
        match self {
            SessionError::User(_) | SessionError::State(_) => Severity::Error,
            SessionError::Backend(_) => Severity::BackendError,
        }
    }
}

/// Display-only severity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity
{
    /// Locally recoverable input or state error.
    Error,
    /// Engine-reported failure.
    BackendError,
}

/// Non-fatal advisory attached to a completed action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning
{
    /// The breakpoint was created but resolved to zero locations.
    #[error("breakpoint on '{symbol}' resolved to no locations")]
    NoLocations
    {
        /// Symbol name the breakpoint was requested for.
        symbol: String,
    },
}

/// Convenience type alias for `Result<T, SessionError>`
pub type SessionResult<T> = std::result::Result<T, SessionError>;
