//! Validation outcomes and error messages.
//!
//! A validation call returns a [`ValidationOutcome`]: a pass/fail flag plus
//! an [`ErrorBag`] with the human-readable messages for each failing field.
//! Outcomes are returned per call rather than cached on the validator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered error messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBag {
    messages: BTreeMap<String, Vec<String>>,
}

impl ErrorBag {
    /// Creates an empty error bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns all messages for a field.
    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first message for a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// Returns true if the field has at least one message.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Returns an iterator over fields with messages.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Returns every message, ordered by field then by rule order.
    pub fn all(&self) -> Vec<&str> {
        self.messages
            .values()
            .flat_map(|msgs| msgs.iter().map(String::as_str))
            .collect()
    }

    /// Returns an iterator over `(field, messages)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.messages
            .iter()
            .map(|(field, msgs)| (field.as_str(), msgs.as_slice()))
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// Returns true if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.values().all(Vec::is_empty)
    }

    /// Appends all messages from another bag.
    pub fn merge(&mut self, other: ErrorBag) {
        for (field, mut msgs) in other.messages {
            self.messages.entry(field).or_default().append(&mut msgs);
        }
    }
}

/// Result of running a rule set against a data bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    /// Whether validation passed
    pub passed: bool,

    /// Messages for failing fields; empty when `passed` is true
    pub errors: ErrorBag,
}

impl ValidationOutcome {
    /// Creates a passing outcome.
    pub fn success() -> Self {
        Self {
            passed: true,
            errors: ErrorBag::new(),
        }
    }

    /// Creates an outcome from collected messages.
    ///
    /// The outcome passes exactly when the bag is empty.
    pub fn from_errors(errors: ErrorBag) -> Self {
        Self {
            passed: errors.is_empty(),
            errors,
        }
    }

    /// Returns true if validation passed.
    pub fn passes(&self) -> bool {
        self.passed
    }

    /// Returns true if validation failed.
    pub fn fails(&self) -> bool {
        !self.passed
    }

    /// Returns the error messages.
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Consumes the outcome, returning the error messages.
    pub fn into_errors(self) -> ErrorBag {
        self.errors
    }
}

/// Custom message templates.
///
/// Keys are either `"<field>.<rule>"` or a bare `"<rule>"`; the field-specific
/// key wins. Templates may use the `:attribute`, `:min`, `:max`, `:values`,
/// `:other` and `:table` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageOverrides {
    templates: BTreeMap<String, String>,
}

impl MessageOverrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    /// Adds a template.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    /// Finds the template for a field and rule.
    pub fn lookup(&self, field: &str, rule: &str) -> Option<&str> {
        self.templates
            .get(&format!("{}.{}", field, rule))
            .or_else(|| self.templates.get(rule))
            .map(String::as_str)
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if there are no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
