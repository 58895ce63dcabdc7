//! # Rules Validator
//!
//! Built-in validation engine for rule sets. This crate evaluates the
//! constraints described by `rules_core`, including:
//!
//! - Presence checks (`required`, `nullable`, `confirmed`)
//! - Type checks (`string`, `integer`, `numeric`, `boolean`, `date`)
//! - Format checks (`email`, `url`, `alpha`, `alpha_num`, `regex`)
//! - Size and membership checks (`min`, `max`, `between`, `in`, `not_in`)
//! - Uniqueness lookups against a [`RecordStore`](rules_core::RecordStore)
//!
//! ## Example
//!
//! ```rust
//! use rules_core::{DataBag, DataValue, StoredRecord, Validator, ValidatorProfile};
//! use rules_core::RuleSet;
//! use rules_validator::{InMemoryStore, RuleEngine};
//! use std::sync::Arc;
//!
//! let mut store = InMemoryStore::new();
//! let mut existing = DataBag::new();
//! existing.insert("id".to_string(), DataValue::Int(42));
//! existing.insert("email".to_string(), DataValue::from("a@b.com"));
//! store.insert("users", existing);
//!
//! let mut profile = ValidatorProfile::new("users");
//! profile.table = Some("users".to_string());
//! profile.uniques = vec!["email".to_string()];
//!
//! let engine = RuleEngine::new().with_store(Arc::new(store));
//! let validator = Validator::new(engine, profile);
//!
//! let rules = RuleSet::from_piped([("email", "required")]).unwrap();
//! let mut data = DataBag::new();
//! data.insert("email".to_string(), DataValue::from("a@b.com"));
//!
//! // Record 42 keeps its own address.
//! let outcome = validator
//!     .validate_for_existing(&data, &rules, &StoredRecord::new(42), None)
//!     .unwrap();
//! assert!(outcome.passes());
//! ```

mod constraints;
mod engine;
pub mod messages;
mod store;

pub use constraints::*;
pub use engine::*;
pub use store::*;
