//! # Breakpoint Registry
//!
//! Session-side bookkeeping of breakpoints, keyed by symbol name.
//!
//! The engine owns the actual breakpoints; this registry only records what
//! the session asked for, deduplicates by symbol name, and feeds the
//! breakpoint prompt's listing. Breakpoints are immutable once created:
//! there is no edit or delete, only reset when a new target replaces the
//! session's world.

use crate::error::UserInputError;

/// One recorded breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointRecord
{
    /// Creation-order id, starting at 1.
    pub id: u32,
    /// Symbol name the breakpoint was set on. Unique within the session.
    pub symbol: String,
    /// Module the symbol was resolved against.
    pub module: String,
    /// Location count reported by the engine at creation time.
    pub location_count: u32,
}

/// Creation-ordered set of breakpoints, unique by symbol name.
#[derive(Debug, Default)]
pub struct BreakpointRegistry
{
    records: Vec<BreakpointRecord>,
}

impl BreakpointRegistry
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Whether a breakpoint with this symbol name already exists.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool
    {
        self.records.iter().any(|r| r.symbol == symbol)
    }

    /// Check that `symbol` is free for registration.
    ///
    /// The session calls this *before* the engine call so a duplicate
    /// never reaches the backend.
    ///
    /// # Errors
    ///
    /// [`UserInputError::DuplicateBreakpoint`] if the name is taken.
    pub fn check_free(&self, symbol: &str) -> Result<(), UserInputError>
    {
        if self.contains(symbol) {
            Err(UserInputError::DuplicateBreakpoint(symbol.to_string()))
        } else {
            Ok(())
        }
    }

    /// Record an engine-confirmed breakpoint.
    ///
    /// # Errors
    ///
    /// [`UserInputError::DuplicateBreakpoint`] if the name is taken.
    pub fn register(&mut self, symbol: &str, module: &str, location_count: u32) -> Result<&BreakpointRecord, UserInputError>
    {
        self.check_free(symbol)?;
        let id = u32::try_from(self.records.len()).unwrap_or(u32::MAX).saturating_add(1);
        self.records.push(BreakpointRecord {
            id,
            symbol: symbol.to_string(),
            module: module.to_string(),
            location_count,
        });
        Ok(self.records.last().unwrap_or_else(|| unreachable!("record was just pushed")))
    }

    /// Display rows in creation order. The iterator is lazy, finite, and
    /// restartable; call `iter()` again to walk it from the start.
    pub fn iter(&self) -> impl Iterator<Item = &BreakpointRecord> + '_
    {
        self.records.iter()
    }

    /// Number of recorded breakpoints.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.records.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.records.is_empty()
    }

    /// Forget all breakpoints. Called when a new target is set.
    pub fn reset(&mut self)
    {
        self.records.clear();
    }
}
