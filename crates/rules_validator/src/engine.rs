//! Main validation engine.
//!
//! This module provides [`RuleEngine`], the built-in [`ValidationEngine`]. It
//! walks every field of a rule set, evaluates its constraints in order and
//! collects rendered messages into an [`ErrorBag`].

use crate::messages::render;
use crate::{ConstraintChecker, FieldContext};
use rules_core::{
    DataBag, EngineError, ErrorBag, MessageOverrides, RecordStore, RuleSet, ValidationEngine,
    ValidationOutcome,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Built-in validation engine.
///
/// # Example
///
/// ```rust
/// use rules_core::{DataBag, DataValue, MessageOverrides, RuleSet, ValidationEngine};
/// use rules_validator::RuleEngine;
///
/// let engine = RuleEngine::new();
/// let rules = RuleSet::from_piped([("email", "required|email")]).unwrap();
///
/// let mut data = DataBag::new();
/// data.insert("email".to_string(), DataValue::from("not-an-email"));
///
/// let outcome = engine.check(&data, &rules, &MessageOverrides::new()).unwrap();
/// assert!(outcome.fails());
/// assert_eq!(
///     outcome.errors().first("email"),
///     Some("The email must be a valid email address.")
/// );
/// ```
pub struct RuleEngine {
    checker: ConstraintChecker,
    bail: bool,
}

impl RuleEngine {
    /// Creates an engine without a record store.
    pub fn new() -> Self {
        Self {
            checker: ConstraintChecker::new(),
            bail: false,
        }
    }

    /// Sets the record store consulted by `unique` rules.
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.checker.set_store(store);
        self
    }

    /// Stops checking a field after its first failing constraint.
    pub fn with_bail(mut self, bail: bool) -> Self {
        self.bail = bail;
        self
    }

    /// Returns true if a record store is configured.
    pub fn has_store(&self) -> bool {
        self.checker.has_store()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine for RuleEngine {
    fn check(
        &self,
        data: &DataBag,
        rules: &RuleSet,
        messages: &MessageOverrides,
    ) -> Result<ValidationOutcome, EngineError> {
        let start = Instant::now();
        let mut errors = ErrorBag::new();

        for (field, constraints) in rules.iter() {
            let ctx = FieldContext::new(field, data, constraints);

            for constraint in constraints {
                if let Some(failure) = self.checker.check(&ctx, constraint)? {
                    errors.add(field, render(field, &failure, messages));
                    if self.bail {
                        break;
                    }
                }
            }
        }

        if rules.is_empty() && !data.is_empty() {
            warn!(fields = data.len(), "Validating data against an empty rule set");
        }

        debug!(
            fields = rules.len(),
            constraints = rules.constraint_count(),
            errors = errors.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "Rule set evaluated"
        );

        Ok(ValidationOutcome::from_errors(errors))
    }
}
