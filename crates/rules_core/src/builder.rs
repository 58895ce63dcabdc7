//! Builder pattern for creating validator profiles.
//!
//! This module provides an ergonomic builder for constructing profiles in code
//! with a fluent API.

use crate::{
    parse_rules, MessageOverrides, OperationKey, OperationRules, RuleError, RuleSet,
    ValidatorProfile,
};
use std::collections::BTreeMap;

/// Builder for creating a `ValidatorProfile`.
///
/// # Example
///
/// ```rust
/// use rules_core::ProfileBuilder;
///
/// let profile = ProfileBuilder::new("users")
///     .description("Account sign-up and profile updates")
///     .table("users")
///     .rules("email", "required|email")
///     .unwrap()
///     .uniques(["email"])
///     .message("email.required", "We need your email.")
///     .build();
///
/// assert_eq!(profile.table.as_deref(), Some("users"));
/// ```
#[derive(Debug, Default)]
pub struct ProfileBuilder {
    name: String,
    description: Option<String>,
    table: Option<String>,
    rules: RuleSet,
    uniques: Vec<String>,
    messages: MessageOverrides,
    operations: BTreeMap<OperationKey, OperationRules>,
}

impl ProfileBuilder {
    /// Creates a new profile builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the profile description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the table checked by unique rules.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Sets default rules for a field from a pipe expression.
    pub fn rules(mut self, field: impl Into<String>, expr: &str) -> Result<Self, RuleError> {
        self.rules.insert(field, parse_rules(expr)?);
        Ok(self)
    }

    /// Replaces the default rule set.
    pub fn rule_set(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the default unique fields.
    pub fn uniques<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uniques = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a custom message template.
    pub fn message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(key, template);
        self
    }

    /// Registers overrides for an operation.
    pub fn operation(mut self, operation: impl Into<OperationKey>, rules: OperationRules) -> Self {
        self.operations.insert(operation.into(), rules);
        self
    }

    /// Sets rules for one field of an operation's rule set.
    ///
    /// The operation's rule set is created empty on first use; it does not
    /// inherit the default rules.
    pub fn operation_rules(
        mut self,
        operation: impl Into<OperationKey>,
        field: impl Into<String>,
        expr: &str,
    ) -> Result<Self, RuleError> {
        let constraints = parse_rules(expr)?;
        self.operations
            .entry(operation.into())
            .or_default()
            .rules
            .get_or_insert_with(RuleSet::new)
            .insert(field, constraints);
        Ok(self)
    }

    /// Sets the unique fields of an operation.
    pub fn operation_uniques<I, S>(mut self, operation: impl Into<OperationKey>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operations.entry(operation.into()).or_default().uniques =
            Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the profile.
    pub fn build(self) -> ValidatorProfile {
        ValidatorProfile {
            name: self.name,
            description: self.description,
            table: self.table,
            rules: self.rules,
            uniques: self.uniques,
            messages: self.messages,
            operations: self.operations,
        }
    }
}
