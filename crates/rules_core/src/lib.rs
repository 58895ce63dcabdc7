//! # Rules Core
//!
//! Core data structures and types for declarative input validation.
//!
//! This crate describes *what* to check: rule sets keyed by field name,
//! validator profiles with per-operation overrides, and the composition of
//! uniqueness rules for create and update flows. Evaluating the rules is left
//! to an injected [`ValidationEngine`].
//!
//! ## Key Concepts
//!
//! - **Rule set**: mapping from field name to the ordered constraints it must satisfy
//! - **Uniqueness constraint**: a rule requiring a field's value be absent elsewhere
//!   in a table, optionally excluding one record by identifier
//! - **Existing-record mode**: validation of an update, which must not reject
//!   the record's own current values under uniqueness rules
//! - **Profile**: the rules, unique fields, messages and operation overrides of
//!   one validator type
//!
//! ## Example
//!
//! ```rust
//! use rules_core::{compose_uniques, RuleSet, StoredRecord};
//!
//! let rules = RuleSet::from_piped([("email", "required|email")]).unwrap();
//! let uniques = vec!["email".to_string()];
//! let record = StoredRecord::new(42);
//!
//! let update = compose_uniques(&rules, &uniques, "users", Some(&record));
//! assert_eq!(
//!     update.to_piped("email").as_deref(),
//!     Some("required|email|unique:users,email,42")
//! );
//! ```

pub mod builder;
pub mod compose;
pub mod engine;
pub mod error;
pub mod operation;
pub mod outcome;
pub mod profile;
pub mod record;
pub mod rules;
pub mod validator;
pub mod value;

pub use builder::*;
pub use compose::*;
pub use engine::*;
pub use error::*;
pub use operation::*;
pub use outcome::*;
pub use profile::*;
pub use record::*;
pub use rules::*;
pub use validator::*;
pub use value::*;
