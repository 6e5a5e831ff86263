//! Declarative, per-field validation of nested request data.
//!
//! Field rules are written as directive strings (`"email"`, `"min:18"`,
//! `"regex:/^[a-z]+$/"`, `"requiredWithout:phone"`) or as predicates, and are
//! checked against one record (a `serde_json::Value` object) at a time:
//!
//! ```text
//! RuleSpecs → compile → CompiledRules
//!     per field: RequirementEngine → MetaRule::validate → Rule → Predicates
//! → FieldData (the record, unchanged) | ValidationError (first failure)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use fieldguard::{RuleSpecs, Validator};
//! use serde_json::json;
//!
//! let validator = Validator::new(
//!     RuleSpecs::new()
//!         .field("email", ["required", "email"])
//!         .field("age", ["integer", "min:18"]),
//! );
//!
//! let data = validator
//!     .validate(json!({"email": "a@b.com", "age": "20"}))
//!     .expect("valid record");
//! assert_eq!(data.get_field("age").unwrap(), "20");
//!
//! let err = validator.validate(json!({"age": 20})).unwrap_err();
//! assert_eq!(err.to_string(), "Required field 'email' is missing.");
//! ```
//!
//! Validation is fail-fast: the first violated rule, in field-declaration
//! then rule-declaration order, ends the run.

pub mod accessor;
pub mod compiled;
pub mod config;
pub mod directive;
pub mod error;
pub mod messages;
pub mod meta_rule;
pub mod primitives;
pub mod registry;
pub mod requirement;
pub mod rules;
pub mod validator;

pub use accessor::FieldData;
pub use compiled::{CompiledRules, CustomMessages, RuleSpec, RuleSpecs, SpecEntry};
pub use config::ValidatorConfig;
pub use directive::{Directive, parse_directive};
pub use error::*;
pub use messages::{EnglishLocalizer, Localizer, Message};
pub use meta_rule::{MetaRule, Predicate, PredicateOutcome};
pub use registry::RuleRegistry;
pub use requirement::{FieldRequirementConstraints, RequirementEngine};
pub use validator::Validator;

use std::sync::Arc;

/// Convenience entry point: validates `data` against `specs` with a fresh
/// rule registry.
///
/// Hosts validating many records should build one [`RuleRegistry`] and
/// share it across [`Validator`]s instead.
///
/// # Errors
///
/// Returns the first failure encountered, see [`Validator::validate`].
///
/// # Example
///
/// ```rust
/// use fieldguard::{CustomMessages, RuleSpecs};
/// use serde_json::json;
///
/// let specs = RuleSpecs::new().field("username", "regex:/^[a-z]+$/");
/// let messages = CustomMessages::new().with("username.regex", "Custom error");
///
/// let err = fieldguard::validate(&specs, &messages, json!({"username": "1234"})).unwrap_err();
/// assert_eq!(err.to_string(), "Custom error");
/// ```
pub fn validate(
    specs: &RuleSpecs,
    messages: &CustomMessages,
    data: serde_json::Value,
) -> Result<FieldData, ValidationError> {
    Validator::new(specs.clone())
        .with_messages(messages.clone())
        .with_registry(Arc::new(RuleRegistry::new()))
        .validate(data)
}
