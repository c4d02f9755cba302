//! Shared value types.

use std::fmt;

/// Strongly typed memory address
///
/// This wrapper around `u64` provides type safety when working with memory
/// addresses. It prevents accidentally mixing addresses with other `u64`
/// values (like sizes or counts), and it carries the canonical display form
/// used everywhere in the inspector: a zero-padded 16-hex-digit string.
///
/// ## Example
///
/// ```rust
/// use hexspray_core::types::Address;
///
/// let addr = Address::new(0x1000);
/// assert_eq!(addr.to_string(), "0x0000000000001000");
/// assert_eq!(addr.hex_digits(), "0000000000001000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u64);

impl Address
{
    /// Create a new address from a `u64` value
    #[must_use]
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    #[must_use]
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// The 16-hex-digit zero-padded form, without a `0x` prefix.
    ///
    /// This string is the interchange format between the expression
    /// evaluator and the type-spray decoder: exactly 16 lowercase hex
    /// digits, so it always decodes to 8 bytes.
    #[must_use]
    pub fn hex_digits(self) -> String
    {
        format!("{:016x}", self.0)
    }

    /// Split the 16-digit form into the 2/2/4/8-character width groups used
    /// for colored display (one group per register-width bucket).
    #[must_use]
    pub fn hex_groups(self) -> [String; 4]
    {
        let digits = self.hex_digits();
        [
            digits[0..2].to_string(),
            digits[2..4].to_string(),
            digits[4..8].to_string(),
            digits[8..16].to_string(),
        ]
    }

    /// Decode the 16-digit form into its 8 bytes, in string order: the
    /// first two hex digits become the first byte. One convention for every
    /// typed field; no per-field reversal.
    #[must_use]
    pub fn literal_bytes(self) -> [u8; 8]
    {
        self.0.to_be_bytes()
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}
