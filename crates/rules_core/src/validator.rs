//! The validator facade.
//!
//! [`Validator`] ties a [`ValidatorProfile`] to an injected
//! [`ValidationEngine`]. It selects rule sets, composes unique rules for
//! create and update flows and returns the engine's outcome for each call.
//! Nothing is cached between calls, so a validator can be shared across
//! threads whenever its engine can.

use crate::{
    compose_uniques, Call, DataBag, Mode, OperationKey, Record, Result, RuleSet,
    ValidationEngine, ValidationOutcome, ValidatorError, ValidatorProfile,
};
use tracing::{debug, info};

/// Validates data bags against a profile's rules through an engine.
///
/// # Example
///
/// ```rust
/// use rules_core::{
///     DataBag, EngineError, MessageOverrides, ProfileBuilder, RuleSet, ValidationEngine,
///     ValidationOutcome, Validator,
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
///
/// let profile = ProfileBuilder::new("users")
///     .rules("email", "required|email")
///     .unwrap()
///     .build();
/// let validator = Validator::new(AcceptAll, profile);
///
/// let outcome = validator.validate_operation(&"create".into(), &DataBag::new()).unwrap();
/// assert!(outcome.passes());
/// ```
pub struct Validator<E> {
    engine: E,
    profile: ValidatorProfile,
    data: DataBag,
    rules: RuleSet,
}

impl<E: ValidationEngine> Validator<E> {
    /// Creates a validator whose held rules start as the profile's defaults.
    pub fn new(engine: E, profile: ValidatorProfile) -> Self {
        let rules = profile.rules.clone();
        Self {
            engine,
            profile,
            data: DataBag::new(),
            rules,
        }
    }

    /// Replaces the held data bag.
    pub fn with(&mut self, data: DataBag) -> &mut Self {
        self.data = data;
        self
    }

    /// Replaces the held rule set.
    pub fn set_rules(&mut self, rules: RuleSet) -> &mut Self {
        self.rules = rules;
        self
    }

    /// Returns the held data bag.
    pub fn data(&self) -> &DataBag {
        &self.data
    }

    /// Returns the held rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the profile.
    pub fn profile(&self) -> &ValidatorProfile {
        &self.profile
    }

    /// Returns the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validates the held data bag against the held rules.
    pub fn passes(&self) -> Result<ValidationOutcome> {
        self.validate(&self.data, &self.rules)
    }

    /// Runs `rules` against `data` as given.
    ///
    /// A failing validation is `Ok` with a failing outcome.
    pub fn validate(&self, data: &DataBag, rules: &RuleSet) -> Result<ValidationOutcome> {
        debug!(
            profile = %self.profile.name,
            fields = rules.len(),
            constraints = rules.constraint_count(),
            "Running validation"
        );

        let outcome = self.engine.check(data, rules, &self.profile.messages)?;

        info!(
            profile = %self.profile.name,
            passed = outcome.passed,
            errors = outcome.errors.len(),
            "Validation finished"
        );
        Ok(outcome)
    }

    /// Validates a new record: each field in `uniques` must not exist anywhere
    /// in the profile's table.
    pub fn validate_unique(
        &self,
        data: &DataBag,
        rules: &RuleSet,
        uniques: &[String],
    ) -> Result<ValidationOutcome> {
        let composed = self.compose(rules, uniques, None)?;
        self.validate(data, &composed)
    }

    /// Validates an update to `record`.
    ///
    /// Each unique field is checked against the profile's table excluding the
    /// record's own row. When `uniques` is `None` the profile's default unique
    /// fields are used.
    pub fn validate_for_existing(
        &self,
        data: &DataBag,
        rules: &RuleSet,
        record: &dyn Record,
        uniques: Option<&[String]>,
    ) -> Result<ValidationOutcome> {
        let uniques = uniques.unwrap_or(&self.profile.uniques);
        let composed = self.compose(rules, uniques, Some(record))?;
        self.validate(data, &composed)
    }

    /// Validates `data` with the rules registered for `operation`.
    pub fn validate_operation(
        &self,
        operation: &OperationKey,
        data: &DataBag,
    ) -> Result<ValidationOutcome> {
        let rules = self.resolve_rules(operation);
        self.validate(data, rules)
    }

    /// Validates an update to `record` with the rules and unique fields
    /// registered for `operation`.
    pub fn validate_operation_for_existing(
        &self,
        operation: &OperationKey,
        data: &DataBag,
        record: &dyn Record,
    ) -> Result<ValidationOutcome> {
        let rules = self.resolve_rules(operation);
        let uniques = self.profile.uniques_for(operation);
        self.validate_for_existing(data, rules, record, Some(uniques))
    }

    /// Resolves a `validate<Name>[ForExisting]` call name and runs it.
    ///
    /// Existing-record mode is used only when the name carries the
    /// `ForExisting` suffix and a record is supplied; otherwise the
    /// operation's rules run as registered.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Dispatch`] for names of any other shape.
    pub fn dispatch(
        &self,
        call: &str,
        data: &DataBag,
        record: Option<&dyn Record>,
    ) -> Result<ValidationOutcome> {
        let call = Call::parse(call)?;
        debug!(operation = %call.operation, mode = ?call.mode, "Dispatching call");

        match (call.mode, record) {
            (Mode::Existing, Some(record)) => {
                self.validate_operation_for_existing(&call.operation, data, record)
            }
            _ => self.validate_operation(&call.operation, data),
        }
    }

    fn resolve_rules(&self, operation: &OperationKey) -> &RuleSet {
        if !self.profile.has_operation(operation) {
            debug!(operation = %operation, "No rules registered, using defaults");
        }
        self.profile.rules_for(operation)
    }

    fn compose(
        &self,
        rules: &RuleSet,
        uniques: &[String],
        record: Option<&dyn Record>,
    ) -> Result<RuleSet> {
        if uniques.is_empty() {
            return Ok(rules.clone());
        }

        let table = self
            .profile
            .table
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ValidatorError::malformed(format!(
                    "profile '{}' has unique fields but no table",
                    self.profile.name
                ))
            })?;

        Ok(compose_uniques(rules, uniques, table, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Constraint, DataValue, EngineError, ErrorBag, MessageOverrides, ProfileBuilder,
        StoredRecord,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Fails `required` on missing fields and records every rule set it sees.
    #[derive(Default)]
    struct RecordingEngine {
        seen: Mutex<Vec<RuleSet>>,
    }

    impl RecordingEngine {
        fn last(&self) -> RuleSet {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl ValidationEngine for RecordingEngine {
        fn check(
            &self,
            data: &DataBag,
            rules: &RuleSet,
            messages: &MessageOverrides,
        ) -> std::result::Result<ValidationOutcome, EngineError> {
            self.seen.lock().unwrap().push(rules.clone());

            let mut errors = ErrorBag::new();
            for (field, constraints) in rules.iter() {
                if constraints.contains(&Constraint::Required) && !data.contains_key(field) {
                    let message = messages
                        .lookup(field, "required")
                        .unwrap_or("missing")
                        .to_string();
                    errors.add(field, message);
                }
            }
            Ok(ValidationOutcome::from_errors(errors))
        }
    }

    fn profile() -> ValidatorProfile {
        ProfileBuilder::new("users")
            .table("users")
            .rules("email", "required|email")
            .unwrap()
            .uniques(["email"])
            .message("email.required", "We need your email.")
            .operation_rules("update", "name", "required")
            .unwrap()
            .operation_uniques("update", ["username"])
            .build()
    }

    fn bag(pairs: &[(&str, &str)]) -> DataBag {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), DataValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_passes_uses_held_state() {
        let mut validator = Validator::new(RecordingEngine::default(), profile());
        let outcome = validator.passes().unwrap();
        assert!(outcome.fails());
        assert_eq!(outcome.errors().first("email"), Some("We need your email."));

        validator.with(bag(&[("email", "a@b.com")]));
        assert!(validator.passes().unwrap().passes());
    }

    #[test]
    fn test_set_rules_replaces_held_rules() {
        let mut validator = Validator::new(RecordingEngine::default(), profile());
        validator.set_rules(RuleSet::from_piped([("name", "required")]).unwrap());
        validator.with(bag(&[("email", "a@b.com")]));

        let outcome = validator.passes().unwrap();
        assert!(outcome.errors().has("name"));
        assert!(!outcome.errors().has("email"));
    }

    #[test]
    fn test_outcomes_are_not_accumulated() {
        let validator = Validator::new(RecordingEngine::default(), profile());
        let failing = validator.validate(&DataBag::new(), &profile().rules).unwrap();
        assert!(failing.fails());

        let passing = validator
            .validate(&bag(&[("email", "a@b.com")]), &profile().rules)
            .unwrap();
        assert!(passing.passes());
        assert!(passing.errors().is_empty());
    }

    #[test]
    fn test_validate_unique_composes_global_rule() {
        let validator = Validator::new(RecordingEngine::default(), profile());
        validator
            .validate_unique(&DataBag::new(), &profile().rules, &["email".to_string()])
            .unwrap();

        assert_eq!(
            validator.engine().last().to_piped("email").as_deref(),
            Some("required|email|unique:users,email")
        );
    }

    #[test]
    fn test_validate_for_existing_defaults_to_profile_uniques() {
        let validator = Validator::new(RecordingEngine::default(), profile());
        let record = StoredRecord::new(42);
        validator
            .validate_for_existing(&DataBag::new(), &profile().rules, &record, None)
            .unwrap();

        assert_eq!(
            validator.engine().last().to_piped("email").as_deref(),
            Some("required|email|unique:users,email,42")
        );
    }

    #[test]
    fn test_operation_for_existing_uses_operation_uniques() {
        let validator = Validator::new(RecordingEngine::default(), profile());
        let record = StoredRecord::new(7);
        validator
            .validate_operation_for_existing(&"update".into(), &DataBag::new(), &record)
            .unwrap();

        let seen = validator.engine().last();
        assert_eq!(seen.to_piped("name").as_deref(), Some("required"));
        assert_eq!(
            seen.to_piped("username").as_deref(),
            Some("unique:users,username,7")
        );
        assert!(!seen.contains_field("email"));
    }

    #[test]
    fn test_unknown_operation_falls_back_to_defaults() {
        let validator = Validator::new(RecordingEngine::default(), profile());
        validator
            .dispatch("validateName", &DataBag::new(), None)
            .unwrap();
        assert_eq!(validator.engine().last(), profile().rules);
    }

    #[test]
    fn test_dispatch_existing_requires_record() {
        let validator = Validator::new(RecordingEngine::default(), profile());

        validator
            .dispatch("validateUpdateForExisting", &DataBag::new(), None)
            .unwrap();
        assert!(!validator.engine().last().contains_field("username"));

        let record = StoredRecord::new(3);
        validator
            .dispatch("validateUpdateForExisting", &DataBag::new(), Some(&record))
            .unwrap();
        assert_eq!(
            validator.engine().last().to_piped("username").as_deref(),
            Some("unique:users,username,3")
        );
    }

    #[test]
    fn test_dispatch_plain_ignores_record() {
        let validator = Validator::new(RecordingEngine::default(), profile());
        let record = StoredRecord::new(3);
        validator
            .dispatch("validateUpdate", &DataBag::new(), Some(&record))
            .unwrap();
        assert!(!validator.engine().last().contains_field("username"));
    }

    #[test]
    fn test_dispatch_unsupported_call() {
        let validator = Validator::new(RecordingEngine::default(), profile());
        let err = validator
            .dispatch("saveUser", &DataBag::new(), None)
            .unwrap_err();
        assert!(matches!(err, ValidatorError::Dispatch(_)));
        assert_eq!(err.to_string(), "Unsupported operation: saveUser");
    }

    #[test]
    fn test_uniques_without_table_is_malformed() {
        let mut profile = profile();
        profile.table = None;
        let validator = Validator::new(RecordingEngine::default(), profile);

        let err = validator
            .validate_unique(&DataBag::new(), &RuleSet::new(), &["email".to_string()])
            .unwrap_err();
        assert!(matches!(err, ValidatorError::MalformedInput(_)));

        // No uniques, no table needed.
        assert!(
            validator
                .validate_unique(&DataBag::new(), &RuleSet::new(), &[])
                .is_ok()
        );
    }

    #[test]
    fn test_validator_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator<RecordingEngine>>();
    }
}
