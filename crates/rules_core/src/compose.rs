//! Rule composition for uniqueness checks.
//!
//! Given a base rule set, a list of fields that must be unique and optionally
//! the record being updated, [`compose_uniques`] returns a rule set in which
//! every listed field also carries a [`UniqueRule`] on the configured table.
//! When a record is supplied its own identifier is excluded, so re-saving an
//! unchanged record never conflicts with itself.

use crate::{Constraint, Record, RuleSet, UniqueRule};
use tracing::debug;

/// Builds the unique constraint for a single field.
///
/// The rule checks `table.field`. If `record` is persisted (has a key value)
/// the record's row is excluded by its key column.
pub fn unique_rule(table: &str, field: &str, record: Option<&dyn Record>) -> Constraint {
    let mut rule = UniqueRule::new(table).with_column(field);

    if let Some(record) = record {
        if let Some(id) = record.key_value() {
            rule = rule.except(id).with_id_column(record.key_name());
        }
    }

    Constraint::Unique(rule)
}

/// Appends a unique constraint to each field in `uniques`.
///
/// Constraints of fields not listed are preserved verbatim. Listed fields keep
/// their existing constraints and gain the unique rule at the end; a listed
/// field with no entry receives the unique rule as its only constraint.
/// Composing the same list twice appends the rule twice, which does not change
/// the validation result.
///
/// # Example
///
/// ```rust
/// use rules_core::{compose_uniques, RuleSet, StoredRecord};
///
/// let base = RuleSet::new().with_rules("email", "required").unwrap();
/// let uniques = vec!["email".to_string()];
///
/// let create = compose_uniques(&base, &uniques, "users", None);
/// assert_eq!(create.to_piped("email").as_deref(), Some("required|unique:users,email"));
///
/// let record = StoredRecord::new(42);
/// let update = compose_uniques(&base, &uniques, "users", Some(&record));
/// assert_eq!(update.to_piped("email").as_deref(), Some("required|unique:users,email,42"));
/// ```
pub fn compose_uniques(
    rules: &RuleSet,
    uniques: &[String],
    table: &str,
    record: Option<&dyn Record>,
) -> RuleSet {
    let mut composed = rules.clone();

    for field in uniques {
        let constraint = unique_rule(table, field, record);
        debug!(field = %field, rule = %constraint, "Adding unique constraint");
        composed.push(field.clone(), constraint);
    }

    composed
}
