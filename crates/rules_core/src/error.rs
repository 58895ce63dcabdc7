//! Error types for rule composition and validation.
//!
//! A failing validation is never represented here: it is a normal
//! [`ValidationOutcome`](crate::ValidationOutcome). These types only cover
//! malformed input, such as an unparseable rule, an unsupported dispatch call
//! or a unique rule with no record store to check it against.

use thiserror::Error;

/// Result type for validator operations.
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Errors raised while parsing rule expressions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// Rule expression was empty
    #[error("Empty rule expression")]
    Empty,

    /// Rule name is not recognized
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// Rule requires parameters that were not supplied
    #[error("Rule '{rule}' requires {expected} parameter(s)")]
    MissingParameter {
        /// Rule name
        rule: String,
        /// Human-readable description of the expected parameters
        expected: String,
    },

    /// Rule parameter could not be interpreted
    #[error("Invalid parameter '{value}' for rule '{rule}'")]
    InvalidParameter {
        /// Rule name
        rule: String,
        /// Offending parameter
        value: String,
    },
}

impl RuleError {
    /// Creates a new missing parameter error.
    pub fn missing(rule: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MissingParameter {
            rule: rule.into(),
            expected: expected.into(),
        }
    }

    /// Creates a new invalid parameter error.
    pub fn invalid(rule: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            rule: rule.into(),
            value: value.into(),
        }
    }
}

/// Errors raised while resolving a dispatch call name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Call name does not have the `validate<Name>[ForExisting]` shape
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Errors raised by a record store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Table is not known to the store
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Backend failure
    #[error("Record store error: {0}")]
    Backend(String),
}

/// Errors raised by a validation engine for malformed input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A unique rule was evaluated without a record store
    #[error("Rule 'unique' on field '{field}' requires a record store")]
    MissingStore {
        /// Field carrying the unique rule
        field: String,
    },

    /// A regex rule carries a pattern that does not compile
    #[error("Invalid regex pattern for field '{field}': {error}")]
    InvalidRegex {
        /// Field carrying the regex rule
        field: String,
        /// Compiler error
        error: String,
    },

    /// Record store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Main error type for validator operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidatorError {
    /// Rule parsing failed
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Dispatch call could not be resolved
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Engine could not evaluate the rules
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Input data has the wrong shape
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl ValidatorError {
    /// Creates a new malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}
