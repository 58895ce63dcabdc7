//! Rule expressions and rule sets.
//!
//! Rules are written in the familiar pipe grammar (`required|email|max:255`)
//! but are held as a structured [`Constraint`] sum type once parsed. A
//! [`RuleSet`] maps each field to the ordered constraints it must satisfy.

use crate::{Exclusion, RecordId, RuleError, DEFAULT_KEY_NAME};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Placeholder used in the pipe grammar for an omitted positional parameter.
const NULL_PARAM: &str = "NULL";

/// A uniqueness constraint scoped to a table.
///
/// # Example
///
/// ```rust
/// use rules_core::{RecordId, UniqueRule};
///
/// let rule = UniqueRule::new("users").with_column("email").except(RecordId::Int(42));
/// assert_eq!(rule.to_string(), "unique:users,email,42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueRule {
    /// Table holding the existing values
    pub table: String,
    /// Column to check; the validated field name when absent
    pub column: Option<String>,
    /// Identifier of a record whose own value is ignored
    pub except: Option<RecordId>,
    /// Key column of the excepted record; `id` when absent
    pub id_column: Option<String>,
}

impl UniqueRule {
    /// Creates a unique rule on a table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: None,
            except: None,
            id_column: None,
        }
    }

    /// Sets the column to check.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Excludes the record with the given identifier.
    pub fn except(mut self, id: impl Into<RecordId>) -> Self {
        self.except = Some(id.into());
        self
    }

    /// Sets the key column of the excepted record.
    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = Some(id_column.into());
        self
    }

    /// Column checked when this rule is attached to `field`.
    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.column.as_deref().unwrap_or(field)
    }

    /// Row excluded from the lookup, if any.
    pub fn exclusion(&self) -> Option<Exclusion> {
        self.except.as_ref().map(|id| Exclusion {
            id_column: self
                .id_column
                .clone()
                .unwrap_or_else(|| DEFAULT_KEY_NAME.to_string()),
            id: id.clone(),
        })
    }

    fn parse_params(params: &str) -> Result<Self, RuleError> {
        let parts: Vec<&str> = params.split(',').map(str::trim).collect();
        if parts.len() > 4 {
            return Err(RuleError::invalid("unique", params));
        }

        let table = parts[0];
        if table.is_empty() || table == NULL_PARAM {
            return Err(RuleError::missing("unique", "a table"));
        }

        let positional = |idx: usize| {
            parts
                .get(idx)
                .filter(|p| !p.is_empty() && **p != NULL_PARAM)
                .map(|p| p.to_string())
        };

        Ok(Self {
            table: table.to_string(),
            column: positional(1),
            except: positional(2).map(|id| id.parse().unwrap_or_else(|never| match never {})),
            id_column: positional(3),
        })
    }
}

impl fmt::Display for UniqueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id_column = self
            .id_column
            .as_deref()
            .filter(|col| *col != DEFAULT_KEY_NAME);

        let mut parts = vec![self.table.clone()];
        parts.push(self.column.clone().unwrap_or_else(|| NULL_PARAM.to_string()));
        parts.push(
            self.except
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| NULL_PARAM.to_string()),
        );
        parts.push(id_column.unwrap_or(NULL_PARAM).to_string());

        // Trailing placeholders carry no information.
        while parts.len() > 1 && parts.last().map(String::as_str) == Some(NULL_PARAM) {
            parts.pop();
        }

        write!(f, "unique:{}", parts.join(","))
    }
}

/// A single constraint on a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Field must be present and non-empty
    Required,
    /// Field may be null; other constraints are skipped for null values
    Nullable,
    /// Field must be a string
    String,
    /// Field must be an integer (or an integer string)
    Integer,
    /// Field must be numeric (or a numeric string)
    Numeric,
    /// Field must be boolean-like
    Boolean,
    /// Field must be an email address
    Email,
    /// Field must be a URL
    Url,
    /// Field must contain only alphabetic characters
    Alpha,
    /// Field must contain only alphanumeric characters
    AlphaNum,
    /// Field must be a date (RFC 3339 or `YYYY-MM-DD`)
    Date,
    /// Minimum size: string length, collection size or numeric value
    Min(f64),
    /// Maximum size: string length, collection size or numeric value
    Max(f64),
    /// Size within inclusive bounds
    Between(f64, f64),
    /// Value must be one of the listed values
    In(Vec<String>),
    /// Value must not be one of the listed values
    NotIn(Vec<String>),
    /// Value must match the pattern
    Regex(String),
    /// `<field>_confirmation` must equal the field
    Confirmed,
    /// Value must not already exist in a table
    Unique(UniqueRule),
}

impl Constraint {
    /// Rule name as written in the pipe grammar.
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::Nullable => "nullable",
            Constraint::String => "string",
            Constraint::Integer => "integer",
            Constraint::Numeric => "numeric",
            Constraint::Boolean => "boolean",
            Constraint::Email => "email",
            Constraint::Url => "url",
            Constraint::Alpha => "alpha",
            Constraint::AlphaNum => "alpha_num",
            Constraint::Date => "date",
            Constraint::Min(_) => "min",
            Constraint::Max(_) => "max",
            Constraint::Between(_, _) => "between",
            Constraint::In(_) => "in",
            Constraint::NotIn(_) => "not_in",
            Constraint::Regex(_) => "regex",
            Constraint::Confirmed => "confirmed",
            Constraint::Unique(_) => "unique",
        }
    }

    /// Returns true if the constraint applies to missing or null values.
    pub fn is_implicit(&self) -> bool {
        matches!(self, Constraint::Required)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Min(n) | Constraint::Max(n) => write!(f, "{}:{}", self.name(), n),
            Constraint::Between(min, max) => write!(f, "between:{},{}", min, max),
            Constraint::In(values) | Constraint::NotIn(values) => {
                write!(f, "{}:{}", self.name(), values.join(","))
            }
            Constraint::Regex(pattern) => write!(f, "regex:{}", pattern),
            Constraint::Unique(rule) => write!(f, "{}", rule),
            other => f.write_str(other.name()),
        }
    }
}

fn parse_number(rule: &str, param: &str) -> Result<f64, RuleError> {
    param
        .trim()
        .parse::<f64>()
        .map_err(|_| RuleError::invalid(rule, param))
}

fn require_params<'a>(
    rule: &str,
    params: Option<&'a str>,
    expected: &str,
) -> Result<&'a str, RuleError> {
    match params {
        Some(p) if !p.trim().is_empty() => Ok(p),
        _ => Err(RuleError::missing(rule, expected)),
    }
}

impl FromStr for Constraint {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let (name, params) = match s.split_once(':') {
            Some((name, params)) => (name.trim(), Some(params)),
            None => (s, None),
        };
        let name = name.to_ascii_lowercase();

        let flag = |constraint: Constraint| match params {
            None => Ok(constraint),
            Some(p) => Err(RuleError::invalid(constraint.name(), p)),
        };

        match name.as_str() {
            "required" => flag(Constraint::Required),
            "nullable" => flag(Constraint::Nullable),
            "string" => flag(Constraint::String),
            "integer" => flag(Constraint::Integer),
            "numeric" => flag(Constraint::Numeric),
            "boolean" => flag(Constraint::Boolean),
            "email" => flag(Constraint::Email),
            "url" => flag(Constraint::Url),
            "alpha" => flag(Constraint::Alpha),
            "alpha_num" => flag(Constraint::AlphaNum),
            "date" => flag(Constraint::Date),
            "confirmed" => flag(Constraint::Confirmed),
            "min" => {
                let p = require_params("min", params, "1")?;
                Ok(Constraint::Min(parse_number("min", p)?))
            }
            "max" => {
                let p = require_params("max", params, "1")?;
                Ok(Constraint::Max(parse_number("max", p)?))
            }
            "between" => {
                let p = require_params("between", params, "2")?;
                match p.split_once(',') {
                    Some((min, max)) => Ok(Constraint::Between(
                        parse_number("between", min)?,
                        parse_number("between", max)?,
                    )),
                    None => Err(RuleError::missing("between", "2")),
                }
            }
            "in" | "not_in" => {
                let p = require_params(&name, params, "at least 1")?;
                let values = p.split(',').map(str::to_string).collect();
                Ok(if name == "in" {
                    Constraint::In(values)
                } else {
                    Constraint::NotIn(values)
                })
            }
            "regex" => {
                let p = require_params("regex", params, "1")?;
                let pattern = p
                    .strip_prefix('/')
                    .and_then(|inner| inner.strip_suffix('/'))
                    .unwrap_or(p);
                Ok(Constraint::Regex(pattern.to_string()))
            }
            "unique" => {
                let p = require_params("unique", params, "a table")?;
                Ok(Constraint::Unique(UniqueRule::parse_params(p)?))
            }
            _ => Err(RuleError::UnknownRule(name)),
        }
    }
}

/// Parses a pipe-separated rule expression such as `required|email|max:255`.
///
/// Empty segments are ignored. Patterns containing `|` must be supplied as a
/// list of single rules instead.
///
/// # Example
///
/// ```rust
/// use rules_core::{parse_rules, Constraint};
///
/// let rules = parse_rules("required|max:255").unwrap();
/// assert_eq!(rules, vec![Constraint::Required, Constraint::Max(255.0)]);
/// ```
pub fn parse_rules(expr: &str) -> Result<Vec<Constraint>, RuleError> {
    expr.split('|')
        .filter(|segment| !segment.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Renders constraints back into the pipe grammar.
pub fn rules_to_string(constraints: &[Constraint]) -> String {
    constraints
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// Mapping from field name to the ordered constraints it must satisfy.
///
/// # Example
///
/// ```rust
/// use rules_core::RuleSet;
///
/// let rules = RuleSet::new()
///     .with_rules("email", "required|email")
///     .unwrap();
/// assert_eq!(rules.to_piped("email").as_deref(), Some("required|email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: BTreeMap<String, Vec<Constraint>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a rule set from `(field, pipe expression)` pairs.
    pub fn from_piped<I, K, V>(pairs: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut rules = Self::new();
        for (field, expr) in pairs {
            rules.insert(field, parse_rules(expr.as_ref())?);
        }
        Ok(rules)
    }

    /// Adds parsed rules for a field, replacing existing ones.
    pub fn with_rules(mut self, field: impl Into<String>, expr: &str) -> Result<Self, RuleError> {
        self.insert(field, parse_rules(expr)?);
        Ok(self)
    }

    /// Sets the constraints for a field, returning the previous ones.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        constraints: Vec<Constraint>,
    ) -> Option<Vec<Constraint>> {
        self.fields.insert(field.into(), constraints)
    }

    /// Appends a constraint to a field, creating the entry if needed.
    pub fn push(&mut self, field: impl Into<String>, constraint: Constraint) {
        self.fields.entry(field.into()).or_default().push(constraint);
    }

    /// Returns the constraints for a field.
    pub fn get(&self, field: &str) -> Option<&[Constraint]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns the constraints for a field in the pipe grammar.
    pub fn to_piped(&self, field: &str) -> Option<String> {
        self.get(field).map(rules_to_string)
    }

    /// Returns true if the field has an entry.
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns an iterator over field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns an iterator over `(field, constraints)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Constraint])> {
        self.fields
            .iter()
            .map(|(field, constraints)| (field.as_str(), constraints.as_slice()))
    }

    /// Number of fields with rules.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field has rules.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of constraints across all fields.
    pub fn constraint_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, Vec<Constraint>)> for RuleSet {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Constraint>)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, constraints) in &self.fields {
            let rendered: Vec<String> = constraints.iter().map(|c| c.to_string()).collect();
            // A pipe inside a pattern would split the rule when read back.
            if rendered.iter().any(|r| r.contains('|')) {
                map.serialize_entry(field, &rendered)?;
            } else {
                map.serialize_entry(field, &rendered.join("|"))?;
            }
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRules {
    Piped(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, RawRules>::deserialize(deserializer)?;
        let mut rules = RuleSet::new();
        for (field, entry) in raw {
            let constraints = match entry {
                RawRules::Piped(expr) => parse_rules(&expr),
                RawRules::List(items) => items.iter().map(|item| item.parse()).collect(),
            }
            .map_err(|e| de::Error::custom(format!("field '{}': {}", field, e)))?;
            rules.insert(field, constraints);
        }
        Ok(rules)
    }
}
