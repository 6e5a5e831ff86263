//! Uniform representation of one compiled rule: a named directive resolved
//! against the registry, or a user-supplied predicate.

use crate::compiled::CustomMessages;
use crate::directive::Directive;
use crate::error::ValidationError;
use crate::messages::Message;
use crate::registry::RuleRegistry;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// What a custom predicate may return.
///
/// Only an explicit `false` rejects the value; `true`, `()` and anything
/// other than `Some(false)` accept it.
pub trait PredicateOutcome {
    fn rejects(&self) -> bool;
}

impl PredicateOutcome for bool {
    fn rejects(&self) -> bool {
        !*self
    }
}

impl PredicateOutcome for () {
    fn rejects(&self) -> bool {
        false
    }
}

impl PredicateOutcome for Option<bool> {
    fn rejects(&self) -> bool {
        *self == Some(false)
    }
}

/// A user-supplied check on a single field value.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: PredicateOutcome,
    {
        Self(Arc::new(move |value| f(value).rejects()))
    }

    /// Whether the predicate rejects `value`.
    pub fn rejects(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A directive bound to the registry it resolves against and the custom
/// messages that may replace its default failure text.
#[derive(Clone)]
pub struct StandardRule {
    directive: Directive,
    registry: Arc<RuleRegistry>,
    messages: Arc<CustomMessages>,
}

impl fmt::Debug for StandardRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardRule")
            .field("name", &self.directive.name)
            .field("param", &self.directive.param)
            .finish()
    }
}

/// One entry of a field's compiled rule list.
#[derive(Clone, Debug)]
pub enum MetaRule {
    Standard(StandardRule),
    Custom(Predicate),
}

impl MetaRule {
    pub fn standard(
        directive: Directive,
        registry: Arc<RuleRegistry>,
        messages: Arc<CustomMessages>,
    ) -> Self {
        MetaRule::Standard(StandardRule {
            directive,
            registry,
            messages,
        })
    }

    pub fn custom(predicate: Predicate) -> Self {
        MetaRule::Custom(predicate)
    }

    /// The directive name as written; `""` for custom predicates.
    pub fn name(&self) -> &str {
        match self {
            MetaRule::Standard(rule) => &rule.directive.name,
            MetaRule::Custom(_) => "",
        }
    }

    /// The directive parameter; always `None` for custom predicates.
    pub fn param(&self) -> Option<&str> {
        match self {
            MetaRule::Standard(rule) => rule.directive.param.as_deref(),
            MetaRule::Custom(_) => None,
        }
    }

    pub fn directive(&self) -> Option<&Directive> {
        match self {
            MetaRule::Standard(rule) => Some(&rule.directive),
            MetaRule::Custom(_) => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, MetaRule::Custom(_))
    }

    /// Validates one field value.
    ///
    /// # Errors
    ///
    /// - standard rules: an unknown-rule error when the registry has no rule
    ///   by this name, otherwise the rule's own error, with its message
    ///   replaced by the custom message configured for `<field>.<name>`;
    /// - custom rules: a rule violation when the predicate returns `false`.
    pub fn validate(&self, field: &str, value: &Value) -> Result<(), ValidationError> {
        match self {
            MetaRule::Standard(standard) => {
                let name = &standard.directive.name;
                let rule = standard.registry.create(name)?.ok_or_else(|| {
                    ValidationError::from(Message::UnknownRule { name: name.clone() })
                        .with_field(field)
                })?;

                rule.validate(field, value, standard.directive.param.as_deref())
                    .map_err(|error| match standard.messages.get(field, name) {
                        Some(custom) => error.with_message(custom),
                        None => error,
                    })
            }
            MetaRule::Custom(predicate) => {
                if predicate.rejects(value) {
                    Err(Message::CustomValidationFailed {
                        field: field.to_string(),
                    }
                    .into())
                } else {
                    Ok(())
                }
            }
        }
    }
}
