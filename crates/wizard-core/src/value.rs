//! Literal values passed as initializer arguments
//!
//! A [`Value`] is what a parent initializer call receives. Strings are
//! printed as Cairo short-string literals, numbers as plain decimals, raw
//! literals verbatim (they name other identifiers such as constructor
//! arguments) and notes as the wrapped value followed by an inline comment.

use serde::Serialize;

use crate::{Error, Result};

/// Largest integer an IEEE-754 double represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A literal argument value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Quoted short-string literal
    String(String),
    /// Numeric literal; must be a safe integer when rendered
    Number(f64),
    /// Raw text emitted verbatim
    Lit { lit: String },
    /// Inner value with a human-readable comment
    Note { note: String, value: Box<Value> },
}

impl Value {
    pub fn lit(text: impl Into<String>) -> Self {
        Value::Lit { lit: text.into() }
    }

    pub fn note(note: impl Into<String>, value: Value) -> Self {
        Value::Note {
            note: note.into(),
            value: Box::new(value),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// Render a value as Cairo source text
///
/// # Errors
/// Returns `UnrepresentableNumber` for fractional, non-finite or
/// out-of-range numbers.
pub fn print_value(value: &Value) -> Result<String> {
    match value {
        Value::Lit { lit } => Ok(lit.clone()),
        Value::Note { note, value } => Ok(format!("{} /* {} */", print_value(value)?, note)),
        Value::Number(n) => {
            if is_safe_integer(*n) {
                Ok(format!("{}", *n as i64))
            } else {
                Err(Error::UnrepresentableNumber(*n))
            }
        }
        Value::String(s) => Ok(format!("'{}'", s)),
    }
}

fn is_safe_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}
