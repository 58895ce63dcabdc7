//! Operation names and dispatch calls.
//!
//! Validators usually need different rules for different logical operations
//! ("create", "update", "changePassword", ...). Operations are identified by an
//! [`OperationKey`], a camel-cased name, and looked up explicitly in the
//! validator profile. [`Call::parse`] additionally accepts the conventional
//! `validate<Name>[ForExisting]` call names for callers that route by string.

use crate::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt;

const CALL_PREFIX: &str = "validate";
const EXISTING_SUFFIX: &str = "ForExisting";

/// Case-normalized operation name.
///
/// Names are camel-cased: `_`, `-` and spaces separate words, each word is
/// capitalized, separators are dropped and the first character is
/// lower-cased. `"update_profile"`, `"UpdateProfile"` and `"update-profile"`
/// all normalize to `"updateProfile"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct OperationKey(String);

impl OperationKey {
    /// Creates a normalized operation key.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(camel_case(name.as_ref()))
    }

    /// Returns the normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OperationKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for OperationKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<OperationKey> for String {
    fn from(key: OperationKey) -> Self {
        key.0
    }
}

fn camel_case(name: &str) -> String {
    let studly: String = name
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();

    let mut chars = studly.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Execution mode for a dispatched call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the operation's rules as registered
    Plain,
    /// Add unique rules that exclude the record being updated
    Existing,
}

/// A parsed `validate<Name>[ForExisting]` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Operation whose rules apply
    pub operation: OperationKey,
    /// Requested execution mode
    pub mode: Mode,
}

impl Call {
    /// Parses a conventional call name.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnsupportedOperation`] if the name does not
    /// start with `validate`, has an empty `<Name>` (after normalisation), or
    /// contains characters other than ASCII letters, digits and `_`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rules_core::{Call, Mode};
    ///
    /// let call = Call::parse("validateUpdateForExisting").unwrap();
    /// assert_eq!(call.operation.as_str(), "update");
    /// assert_eq!(call.mode, Mode::Existing);
    /// ```
    pub fn parse(name: &str) -> Result<Self, DispatchError> {
        let unsupported = || DispatchError::UnsupportedOperation(name.to_string());

        let rest = name.strip_prefix(CALL_PREFIX).ok_or_else(unsupported)?;
        let (operation, mode) = match rest.strip_suffix(EXISTING_SUFFIX) {
            Some(operation) => (operation, Mode::Existing),
            None => (rest, Mode::Plain),
        };

        if !operation
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(unsupported());
        }

        // Names made only of separators normalise to nothing.
        let operation = OperationKey::new(operation);
        if operation.as_str().is_empty() {
            return Err(unsupported());
        }

        Ok(Self { operation, mode })
    }
}
