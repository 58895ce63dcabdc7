//! Constraint evaluation logic.
//!
//! This module evaluates a single [`Constraint`] against the value submitted
//! for a field. Type rules (`string`, `integer`, `email`, ...), size rules
//! (`min`, `max`, `between`), membership rules and patterns are checked here;
//! `unique` is delegated to a [`RecordStore`].

use crate::messages::{Failure, SizeKind};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use rules_core::{Constraint, DataBag, DataValue, EngineError, RecordStore, UniqueRule};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;
use validator::{ValidateEmail, ValidateUrl};

/// Context shared by all constraints of one field.
pub struct FieldContext<'a> {
    /// Field name
    pub field: &'a str,
    /// Submitted value, `None` when the field is absent
    pub value: Option<&'a DataValue>,
    /// Whole data bag, for rules that look at sibling fields
    pub data: &'a DataBag,
    /// Whether the field also carries `integer` or `numeric`
    pub numeric: bool,
}

impl<'a> FieldContext<'a> {
    /// Builds the context for `field`, inspecting its constraints.
    pub fn new(field: &'a str, data: &'a DataBag, constraints: &[Constraint]) -> Self {
        Self {
            field,
            value: data.get(field),
            data,
            numeric: constraints
                .iter()
                .any(|c| matches!(c, Constraint::Integer | Constraint::Numeric)),
        }
    }

    /// Returns true if the value is missing, null or a blank string.
    pub fn is_empty(&self) -> bool {
        match self.value {
            None | Some(DataValue::Null) => true,
            Some(DataValue::String(s)) => s.trim().is_empty(),
            Some(DataValue::List(items)) => items.is_empty(),
            Some(DataValue::Map(map)) => map.is_empty(),
            Some(_) => false,
        }
    }
}

/// Evaluates constraints.
pub struct ConstraintChecker {
    store: Option<Arc<dyn RecordStore>>,
    /// Cache of compiled regex patterns
    regex_cache: RwLock<HashMap<String, Regex>>,
}

impl ConstraintChecker {
    /// Creates a checker without a record store.
    pub fn new() -> Self {
        Self {
            store: None,
            regex_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the record store used by `unique` rules.
    pub fn set_store(&mut self, store: Arc<dyn RecordStore>) {
        self.store = Some(store);
    }

    /// Returns true if a record store is configured.
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Checks one constraint.
    ///
    /// Returns `Ok(None)` when the constraint holds or does not apply,
    /// `Ok(Some(failure))` when it is violated and `Err` when it cannot be
    /// evaluated.
    pub fn check(
        &self,
        ctx: &FieldContext<'_>,
        constraint: &Constraint,
    ) -> Result<Option<Failure>, EngineError> {
        if constraint.is_implicit() {
            return Ok(ctx.is_empty().then(|| Failure::new("required")));
        }

        // Non-implicit rules only apply to present, non-blank values.
        let value = match ctx.value {
            None | Some(DataValue::Null) => return Ok(None),
            Some(DataValue::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(value) => value,
        };

        let failure = match constraint {
            Constraint::Required | Constraint::Nullable => None,
            Constraint::String => fail_unless(value.as_string().is_some(), "string"),
            Constraint::Integer => fail_unless(is_integer(value), "integer"),
            Constraint::Numeric => fail_unless(as_number(value).is_some(), "numeric"),
            Constraint::Boolean => fail_unless(is_boolean(value), "boolean"),
            Constraint::Email => fail_unless(
                value.as_string().is_some_and(|s| s.validate_email()),
                "email",
            ),
            Constraint::Url => {
                fail_unless(value.as_string().is_some_and(|s| s.validate_url()), "url")
            }
            Constraint::Alpha => fail_unless(
                value
                    .as_string()
                    .is_some_and(|s| s.chars().all(char::is_alphabetic)),
                "alpha",
            ),
            Constraint::AlphaNum => fail_unless(
                value
                    .as_string()
                    .is_some_and(|s| s.chars().all(char::is_alphanumeric)),
                "alpha_num",
            ),
            Constraint::Date => fail_unless(is_date(value), "date"),
            Constraint::Min(min) => self.check_size(ctx, value, "min", Some(*min), None),
            Constraint::Max(max) => self.check_size(ctx, value, "max", None, Some(*max)),
            Constraint::Between(min, max) => {
                self.check_size(ctx, value, "between", Some(*min), Some(*max))
            }
            Constraint::In(allowed) => fail_unless(in_list(value, allowed), "in")
                .map(|f| f.param("values", allowed.join(", "))),
            Constraint::NotIn(denied) => fail_unless(!any_in_list(value, denied), "not_in")
                .map(|f| f.param("values", denied.join(", "))),
            Constraint::Regex(pattern) => self.check_pattern(ctx, value, pattern)?,
            Constraint::Confirmed => {
                let other = format!("{}_confirmation", ctx.field);
                fail_unless(ctx.data.get(&other) == Some(value), "confirmed")
                    .map(|f| f.param("other", other))
            }
            Constraint::Unique(rule) => self.check_unique(ctx, value, rule)?,
        };

        if let Some(failure) = &failure {
            debug!(field = ctx.field, rule = failure.rule, "Constraint failed");
        }
        Ok(failure)
    }

    fn check_size(
        &self,
        ctx: &FieldContext<'_>,
        value: &DataValue,
        rule: &'static str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Option<Failure> {
        let (size, kind) = measure(value, ctx.numeric);

        let within = size.is_some_and(|size| {
            min.is_none_or(|min| size >= min) && max.is_none_or(|max| size <= max)
        });
        if within {
            return None;
        }

        let mut failure = Failure::new(rule).sized(kind);
        if let Some(min) = min {
            failure = failure.param("min", min.to_string());
        }
        if let Some(max) = max {
            failure = failure.param("max", max.to_string());
        }
        Some(failure)
    }

    fn check_pattern(
        &self,
        ctx: &FieldContext<'_>,
        value: &DataValue,
        pattern: &str,
    ) -> Result<Option<Failure>, EngineError> {
        let text = match value {
            DataValue::String(s) | DataValue::Timestamp(s) => s.clone(),
            DataValue::Int(_) | DataValue::Float(_) => value.to_text(),
            _ => return Ok(Some(Failure::new("regex"))),
        };

        let is_match = self.with_regex(ctx.field, pattern, |regex| regex.is_match(&text))?;
        Ok(fail_unless(is_match, "regex"))
    }

    fn check_unique(
        &self,
        ctx: &FieldContext<'_>,
        value: &DataValue,
        rule: &UniqueRule,
    ) -> Result<Option<Failure>, EngineError> {
        let store = self.store.as_ref().ok_or_else(|| EngineError::MissingStore {
            field: ctx.field.to_string(),
        })?;

        let column = rule.column_for(ctx.field);
        let exclusion = rule.exclusion();
        let exists = store.value_exists(&rule.table, column, value, exclusion.as_ref())?;

        debug!(
            field = ctx.field,
            table = %rule.table,
            column,
            except = ?exclusion.as_ref().map(|e| e.id.to_string()),
            exists,
            "Checked uniqueness"
        );

        Ok(fail_unless(!exists, "unique").map(|f| f.param("table", rule.table.clone())))
    }

    /// Runs `f` with a compiled regex, compiling and caching it on first use.
    fn with_regex<T>(
        &self,
        field: &str,
        pattern: &str,
        f: impl FnOnce(&Regex) -> T,
    ) -> Result<T, EngineError> {
        if let Ok(cache) = self.regex_cache.read() {
            if let Some(regex) = cache.get(pattern) {
                return Ok(f(regex));
            }
        }

        let regex = Regex::new(pattern).map_err(|e| EngineError::InvalidRegex {
            field: field.to_string(),
            error: e.to_string(),
        })?;
        let result = f(&regex);

        if let Ok(mut cache) = self.regex_cache.write() {
            cache.insert(pattern.to_string(), regex);
        }
        Ok(result)
    }
}

impl Default for ConstraintChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn fail_unless(ok: bool, rule: &'static str) -> Option<Failure> {
    (!ok).then(|| Failure::new(rule))
}

fn is_integer(value: &DataValue) -> bool {
    match value {
        DataValue::Int(_) => true,
        DataValue::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn as_number(value: &DataValue) -> Option<f64> {
    match value {
        DataValue::Int(i) => Some(*i as f64),
        DataValue::Float(f) => Some(*f).filter(|f| f.is_finite()),
        DataValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn is_boolean(value: &DataValue) -> bool {
    match value {
        DataValue::Bool(_) => true,
        DataValue::Int(i) => *i == 0 || *i == 1,
        DataValue::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
        _ => false,
    }
}

fn is_date(value: &DataValue) -> bool {
    let text = match value {
        DataValue::String(s) | DataValue::Timestamp(s) => s.trim(),
        _ => return false,
    };
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// Measures a value for size rules.
///
/// Strings are measured by character count unless the field is numeric and
/// the string parses as a number.
fn measure(value: &DataValue, numeric: bool) -> (Option<f64>, SizeKind) {
    match value {
        DataValue::Int(_) | DataValue::Float(_) => (as_number(value), SizeKind::Numeric),
        DataValue::String(s) => match as_number(value).filter(|_| numeric) {
            Some(n) => (Some(n), SizeKind::Numeric),
            None => (Some(s.chars().count() as f64), SizeKind::String),
        },
        DataValue::List(items) => (Some(items.len() as f64), SizeKind::Items),
        DataValue::Map(map) => (Some(map.len() as f64), SizeKind::Items),
        _ => (None, SizeKind::String),
    }
}

fn in_list(value: &DataValue, allowed: &[String]) -> bool {
    match value {
        DataValue::List(items) => items.iter().all(|item| in_list(item, allowed)),
        DataValue::Map(_) | DataValue::Null => false,
        other => {
            let text = other.to_text();
            allowed.iter().any(|a| *a == text)
        }
    }
}

fn any_in_list(value: &DataValue, denied: &[String]) -> bool {
    match value {
        DataValue::List(items) => items.iter().any(|item| any_in_list(item, denied)),
        DataValue::Map(_) | DataValue::Null => false,
        other => {
            let text = other.to_text();
            denied.iter().any(|d| *d == text)
        }
    }
}
