//! # Address Expression Evaluator
//!
//! Turns user-typed text like `rax+8*2` into a validated [`Address`].
//!
//! The pipeline is deliberately strict because the input comes straight
//! from a prompt:
//!
//! 1. Case-fold to lowercase.
//! 2. Substitute register mnemonics with their current printed values,
//!    longest name first, so `sil` is never half-eaten by `si`.
//! 3. Validate that every remaining character belongs to the alphabet
//!    `0-9 a-f x + - *`.
//! 4. Run a purpose-built recursive-descent parser over hexadecimal
//!    integer literals with `+ - *` and standard precedence. There is no
//!    general-purpose evaluator anywhere on this path.
//! 5. Reject negative results; format the rest as a 16-hex-digit address.
//!
//! Every literal is hexadecimal, with or without a `0x` prefix; the
//! restricted alphabet leaves no way to mark a literal as decimal.

use std::collections::HashMap;

use crate::error::UserInputError;
use crate::types::Address;

/// Evaluate an address expression against the current register values.
///
/// `registers` maps lowercase register names to their printed hex values
/// (`0x…`), as captured by the register tracker at the last stop.
///
/// # Errors
///
/// - [`UserInputError::InvalidExpression`] if a character outside the
///   restricted alphabet survives substitution,
/// - [`UserInputError::ParseFailure`] if the expression is malformed or
///   the arithmetic overflows,
/// - [`UserInputError::NegativeAddress`] if the result is below zero.
pub fn evaluate(expression: &str, registers: &HashMap<String, String>) -> Result<Address, UserInputError>
{
    let substituted = substitute_registers(&expression.to_lowercase(), registers);
    validate_alphabet(&substituted)?;

    let value = Parser::new(&substituted).parse()?;
    if value < 0 {
        return Err(UserInputError::NegativeAddress);
    }
    u64::try_from(value).map(Address::new).map_err(|_| UserInputError::ParseFailure)
}

/// Replace each register mnemonic occurring in `text` with its printed
/// value.
///
/// Longer names are substituted first so that an 8-bit sub-register name
/// (`sil`) is resolved before a shorter overlapping name (`si`) can
/// shadow its prefix. Ties break on the name itself to keep the pass
/// deterministic.
fn substitute_registers(text: &str, registers: &HashMap<String, String>) -> String
{
    let mut names: Vec<&String> = registers.keys().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut output = text.to_string();
    for name in names {
        if output.contains(name.as_str()) {
            output = output.replace(name.as_str(), &registers[name]);
        }
    }
    output
}

/// Reject any character outside `0-9 a-f x + - *`.
fn validate_alphabet(text: &str) -> Result<(), UserInputError>
{
    if text.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f' | 'x' | '+' | '-' | '*')) {
        Ok(())
    } else {
        Err(UserInputError::InvalidExpression)
    }
}

/// Recursive-descent parser for `+ - *` over hex literals.
///
/// Grammar:
///
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := factor ('*' factor)*
/// factor := ('+' | '-')* literal
/// ```
///
/// Arithmetic runs in `i128` with checked operations, so intermediate
/// overflow is caught rather than wrapped.
struct Parser<'a>
{
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a>
{
    fn new(text: &'a str) -> Self
    {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn parse(mut self) -> Result<i128, UserInputError>
    {
        let value = self.expr()?;
        if self.chars.peek().is_some() {
            return Err(UserInputError::ParseFailure);
        }
        Ok(value)
    }

    fn expr(&mut self) -> Result<i128, UserInputError>
    {
        let mut value = self.term()?;
        while let Some(&op) = self.chars.peek() {
            match op {
                '+' => {
                    self.chars.next();
                    let rhs = self.term()?;
                    value = value.checked_add(rhs).ok_or(UserInputError::ParseFailure)?;
                }
                '-' => {
                    self.chars.next();
                    let rhs = self.term()?;
                    value = value.checked_sub(rhs).ok_or(UserInputError::ParseFailure)?;
                }
                _ => return Err(UserInputError::ParseFailure),
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<i128, UserInputError>
    {
        let mut value = self.factor()?;
        while self.chars.peek() == Some(&'*') {
            self.chars.next();
            let rhs = self.factor()?;
            value = value.checked_mul(rhs).ok_or(UserInputError::ParseFailure)?;
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<i128, UserInputError>
    {
        let mut negate = false;
        while let Some(&sign) = self.chars.peek() {
            match sign {
                '+' => {
                    self.chars.next();
                }
                '-' => {
                    self.chars.next();
                    negate = !negate;
                }
                _ => break,
            }
        }

        let value = self.literal()?;
        Ok(if negate { -value } else { value })
    }

    /// One hex literal: a maximal run of `[0-9a-fx]`, which must be either
    /// `0x` followed by hex digits or hex digits containing no `x`.
    fn literal(&mut self) -> Result<i128, UserInputError>
    {
        let mut run = String::new();
        while let Some(&c) = self.chars.peek() {
            if matches!(c, '0'..='9' | 'a'..='f' | 'x') {
                run.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        let digits = run.strip_prefix("0x").unwrap_or(&run);
        if digits.is_empty() || digits.contains('x') {
            return Err(UserInputError::ParseFailure);
        }
        i128::from_str_radix(digits, 16).map_err(|_| UserInputError::ParseFailure)
    }
}
