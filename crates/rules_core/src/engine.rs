//! Collaborator traits.
//!
//! The validator does not evaluate constraints itself. It hands the data bag,
//! the composed rule set and the message overrides to a [`ValidationEngine`],
//! and engines that support `unique` rules consult a [`RecordStore`].

use crate::{
    DataBag, DataValue, EngineError, Exclusion, MessageOverrides, RuleSet, StoreError,
    ValidationOutcome,
};

/// Evaluates a rule set against a data bag.
///
/// Implementations must be deterministic for identical inputs and report
/// failures keyed by field name with messages in rule order. A failing
/// validation is returned as `Ok` with a failing outcome; `Err` is reserved
/// for input the engine cannot evaluate.
///
/// # Example
///
/// ```rust
/// use rules_core::{
///     DataBag, EngineError, MessageOverrides, RuleSet, ValidationEngine, ValidationOutcome,
/// };
///
/// struct AcceptAll;
///
/// impl ValidationEngine for AcceptAll {
///     fn check(
///         &self,
///         _data: &DataBag,
///         _rules: &RuleSet,
///         _messages: &MessageOverrides,
///     ) -> Result<ValidationOutcome, EngineError> {
///         Ok(ValidationOutcome::success())
///     }
/// }
/// ```
pub trait ValidationEngine: Send + Sync {
    /// Runs `rules` against `data`, formatting failures with `messages`.
    fn check(
        &self,
        data: &DataBag,
        rules: &RuleSet,
        messages: &MessageOverrides,
    ) -> Result<ValidationOutcome, EngineError>;
}

/// Answers existence queries for `unique` rules.
pub trait RecordStore: Send + Sync {
    /// Returns true if `table.column` already holds `value` in a row other
    /// than the excluded one.
    fn value_exists(
        &self,
        table: &str,
        column: &str,
        value: &DataValue,
        except: Option<&Exclusion>,
    ) -> Result<bool, StoreError>;
}

impl<E: ValidationEngine + ?Sized> ValidationEngine for Box<E> {
    fn check(
        &self,
        data: &DataBag,
        rules: &RuleSet,
        messages: &MessageOverrides,
    ) -> Result<ValidationOutcome, EngineError> {
        (**self).check(data, rules, messages)
    }
}

impl<E: ValidationEngine + ?Sized> ValidationEngine for std::sync::Arc<E> {
    fn check(
        &self,
        data: &DataBag,
        rules: &RuleSet,
        messages: &MessageOverrides,
    ) -> Result<ValidationOutcome, EngineError> {
        (**self).check(data, rules, messages)
    }
}
