//! # Register Snapshot & Diff Tracker
//!
//! Buckets the general-purpose registers by printed width and flags which
//! values changed since the previous stop.
//!
//! The width of a register is not re-derived from its name or from
//! architecture tables; it is taken from the width the engine itself
//! printed. A 64-bit register prints as `0x` plus 16 digits (18
//! characters), a 32-bit one as 10, and so on. Classifying by printed
//! length keeps the buckets consistent with whatever the engine chose to
//! display, including sub-registers like `al`/`ax`/`eax`.
//!
//! The tracker owns the only piece of cross-stop state in the inspector:
//! the baseline map of previously seen values. It lives for the duration
//! of a session and is reset when a new target is set.

use std::collections::HashMap;

/// Width bucket a register is displayed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidthBucket
{
    /// 8-bit registers, and the fallback for unrecognized print widths.
    B8,
    /// 16-bit registers.
    B16,
    /// 32-bit registers.
    B32,
    /// 64-bit registers.
    B64,
}

impl WidthBucket
{
    /// Classify by the character length of the printed value
    /// (`0x` prefix included): 4 → 8-bit, 6 → 16-bit, 10 → 32-bit,
    /// 18 → 64-bit, anything else → 8-bit.
    #[must_use]
    pub fn classify(printed_value: &str) -> Self
    {
        match printed_value.len() {
            6 => WidthBucket::B16,
            10 => WidthBucket::B32,
            18 => WidthBucket::B64,
            _ => WidthBucket::B8,
        }
    }

    /// Display label for the bucket's pane.
    #[must_use]
    pub const fn label(self) -> &'static str
    {
        match self {
            WidthBucket::B8 => "8-bit",
            WidthBucket::B16 => "16-bit",
            WidthBucket::B32 => "32-bit",
            WidthBucket::B64 => "64-bit",
        }
    }

    /// All buckets in display order, widest first.
    pub const ALL: [WidthBucket; 4] = [WidthBucket::B64, WidthBucket::B32, WidthBucket::B16, WidthBucket::B8];
}

/// One register as displayed: name, printed value, and whether the value
/// differs from the previous stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCell
{
    pub name: String,
    pub value: String,
    pub changed: bool,
}

/// The bucketed view of one stop's general-purpose registers.
///
/// Each bucket preserves engine iteration order independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterSnapshot
{
    pub b64: Vec<RegisterCell>,
    pub b32: Vec<RegisterCell>,
    pub b16: Vec<RegisterCell>,
    pub b8: Vec<RegisterCell>,
}

impl RegisterSnapshot
{
    /// The cells of one bucket.
    #[must_use]
    pub fn bucket(&self, bucket: WidthBucket) -> &[RegisterCell]
    {
        match bucket {
            WidthBucket::B64 => &self.b64,
            WidthBucket::B32 => &self.b32,
            WidthBucket::B16 => &self.b16,
            WidthBucket::B8 => &self.b8,
        }
    }

    /// Name → printed value over every bucket, for the expression
    /// evaluator's register substitution.
    #[must_use]
    pub fn values(&self) -> HashMap<String, String>
    {
        [&self.b64, &self.b32, &self.b16, &self.b8]
            .into_iter()
            .flatten()
            .map(|cell| (cell.name.clone(), cell.value.clone()))
            .collect()
    }

    /// True when no registers were captured (no stopped frame).
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.b64.is_empty() && self.b32.is_empty() && self.b16.is_empty() && self.b8.is_empty()
    }
}

/// Session-scoped register diff state.
///
/// `observe` is the only mutating entry point: it produces the bucketed
/// snapshot for one stop and unconditionally overwrites the baseline with
/// the observed values.
#[derive(Debug, Default)]
pub struct RegisterTracker
{
    previous: HashMap<String, String>,
}

impl RegisterTracker
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Ingest one stop's `(name, printed value)` pairs.
    ///
    /// A register is marked changed iff a previous value was recorded for
    /// the same name and differs from the current one. First sightings are
    /// unmarked.
    pub fn observe(&mut self, pairs: &[(String, String)]) -> RegisterSnapshot
    {
        let mut snapshot = RegisterSnapshot::default();

        for (name, value) in pairs {
            let changed = self.previous.get(name).is_some_and(|prev| prev != value);
            self.previous.insert(name.clone(), value.clone());

            let cell = RegisterCell {
                name: name.clone(),
                value: value.clone(),
                changed,
            };
            match WidthBucket::classify(value) {
                WidthBucket::B64 => snapshot.b64.push(cell),
                WidthBucket::B32 => snapshot.b32.push(cell),
                WidthBucket::B16 => snapshot.b16.push(cell),
                WidthBucket::B8 => snapshot.b8.push(cell),
            }
        }

        snapshot
    }

    /// Current baseline value for a register, if one was recorded.
    #[must_use]
    pub fn baseline(&self, name: &str) -> Option<&str>
    {
        self.previous.get(name).map(String::as_str)
    }

    /// Drop the baseline. Called when a new target is set, so the first
    /// stop of the next process shows no stale change marks.
    pub fn reset(&mut self)
    {
        self.previous.clear();
    }
}
