//! Error types for the contract wizard
//!
//! All fallible operations return `Result<T, Error>`.
//! Nothing is retried or recovered internally; every error propagates
//! to the immediate caller.

use std::collections::BTreeMap;
use std::fmt;

/// Per-field messages explaining why an options object was rejected
pub type OptionsErrorMessages = BTreeMap<String, String>;

/// Invalid option combination, detected before any IR mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsError {
    pub messages: OptionsErrorMessages,
}

impl OptionsError {
    pub fn new(messages: OptionsErrorMessages) -> Self {
        Self { messages }
    }

    /// Single-field convenience constructor
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut messages = OptionsErrorMessages::new();
        messages.insert(field.to_string(), message.into());
        Self { messages }
    }
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (field, message)) in self.messages.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

/// Contract wizard error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid cross-option combination (generation aborts, no IR is returned)
    #[error("Invalid options: {0}")]
    Options(OptionsError),

    /// Code appended to a function whose body was set in one shot
    #[error("Function {function} is already finalized")]
    FunctionFinalized { function: String },

    /// Whole-body replacement after incremental code was appended
    #[error("Function {function} has additional code")]
    FunctionHasCode { function: String },

    /// Numeric literal that is not a safe integer
    #[error("Number not representable ({0})")]
    UnrepresentableNumber(f64),

    /// Natspec key not matching `^(@custom:)?[a-z][a-z-]*$`
    #[error("Invalid natspec key: {0}")]
    InvalidNatspecKey(String),
}

impl From<OptionsError> for Error {
    fn from(err: OptionsError) -> Self {
        Error::Options(err)
    }
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, Error>;
