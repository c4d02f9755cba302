//! # hexspray-core
//!
//! Debug session control and memory inspection for hexspray.
//!
//! This crate holds everything below the terminal UI:
//!
//! - The [`session::Session`] state machine, which sequences target
//!   selection, launching, breakpoints, and single-instruction stepping
//!   against a synchronous debugging engine.
//! - The [`registers`] tracker, which buckets general-purpose registers by
//!   printed width and flags changes across stops.
//! - The [`eval`] address expression evaluator: register substitution plus
//!   a dedicated `+ - *` parser over hex literals.
//! - The [`decode`] type-spray decoder, interpreting one buffer as every
//!   primitive type simultaneously.
//! - The [`backend`] trait, the boundary to the native engine, with a
//!   deterministic scripted implementation for tests and demos.
//!
//! The engine is driven exclusively in synchronous mode: launch, continue,
//! and step block until the engine reports a stable state. The front end
//! is deliberately unresponsive while the debuggee runs; deterministic
//! stepping is the point.

pub mod backend;
pub mod breakpoints;
pub mod decode;
pub mod error;
pub mod eval;
pub mod registers;
pub mod session;
pub mod types;

pub use backend::{Backend, create_backend};
pub use error::{SessionError, SessionResult};
pub use session::Session;
pub use types::Address;
