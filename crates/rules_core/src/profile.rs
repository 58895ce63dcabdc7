//! Validator profiles.
//!
//! A [`ValidatorProfile`] is the declarative description of one validator
//! type: the table its unique rules refer to, the default rules and unique
//! fields, custom messages, and per-operation overrides. Lookups are explicit:
//! an operation without its own rules or uniques falls back to the defaults.

use crate::{MessageOverrides, OperationKey, RuleSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rule overrides for one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationRules {
    /// Rules replacing the default rule set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleSet>,

    /// Unique fields replacing the default list in existing-record mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniques: Option<Vec<String>>,
}

/// Declarative configuration for a validator.
///
/// # Example
///
/// ```rust
/// use rules_core::{OperationKey, ProfileBuilder};
///
/// let profile = ProfileBuilder::new("users")
///     .table("users")
///     .rules("email", "required|email")
///     .unwrap()
///     .uniques(["email"])
///     .operation_rules("update", "name", "required")
///     .unwrap()
///     .build();
///
/// let update = OperationKey::new("update");
/// assert!(profile.rules_for(&update).contains_field("name"));
/// assert_eq!(profile.uniques_for(&update), ["email".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorProfile {
    /// Name identifying this validator
    pub name: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Table checked by unique rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Default rule set
    #[serde(default)]
    pub rules: RuleSet,

    /// Default unique fields for existing-record mode
    #[serde(default)]
    pub uniques: Vec<String>,

    /// Custom message templates
    #[serde(default)]
    pub messages: MessageOverrides,

    /// Per-operation overrides
    #[serde(default)]
    pub operations: BTreeMap<OperationKey, OperationRules>,
}

impl ValidatorProfile {
    /// Creates an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns the rules registered for an operation, or the default rules.
    pub fn rules_for(&self, operation: &OperationKey) -> &RuleSet {
        self.operations
            .get(operation)
            .and_then(|op| op.rules.as_ref())
            .unwrap_or(&self.rules)
    }

    /// Returns the unique fields registered for an operation, or the defaults.
    pub fn uniques_for(&self, operation: &OperationKey) -> &[String] {
        self.operations
            .get(operation)
            .and_then(|op| op.uniques.as_deref())
            .unwrap_or(&self.uniques)
    }

    /// Returns true if the operation has its own entry.
    pub fn has_operation(&self, operation: &OperationKey) -> bool {
        self.operations.contains_key(operation)
    }

    /// Returns true if any default or per-operation unique fields are set.
    pub fn uses_uniques(&self) -> bool {
        !self.uniques.is_empty()
            || self
                .operations
                .values()
                .any(|op| op.uniques.as_ref().is_some_and(|u| !u.is_empty()))
    }

    /// Checks the profile for configuration mistakes.
    ///
    /// Returns a list of problems; an empty list means the profile is usable.
    pub fn check_definition(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("profile name cannot be empty".to_string());
        }

        let has_table = self.table.as_deref().is_some_and(|t| !t.trim().is_empty());
        if self.uses_uniques() && !has_table {
            problems.push("unique fields are configured but no table is set".to_string());
        }

        problems
    }
}
