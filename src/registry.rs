//! The rule catalog and the cached rule factory built on top of it.

use crate::error::ValidationError;
use crate::messages::{EnglishLocalizer, Localizer, Message};
use crate::primitives::Predicates;
use crate::rules::{BuiltinRule, Rule};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// A catalog entry mapping a directive name to its built-in rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleEntry {
    pub name: &'static str,
    pub rule: BuiltinRule,
}

/// The built-in rule catalog as a compile-time constant.
pub static RULE_CATALOG: &[RuleEntry] = &[
    RuleEntry {
        name: "array",
        rule: BuiltinRule::Array,
    },
    RuleEntry {
        name: "datetime",
        rule: BuiltinRule::Datetime,
    },
    RuleEntry {
        name: "email",
        rule: BuiltinRule::Email,
    },
    RuleEntry {
        name: "file",
        rule: BuiltinRule::File,
    },
    RuleEntry {
        name: "integer",
        rule: BuiltinRule::Integer,
    },
    RuleEntry {
        name: "maxLength",
        rule: BuiltinRule::MaxLength,
    },
    RuleEntry {
        name: "max",
        rule: BuiltinRule::Max,
    },
    RuleEntry {
        name: "minLength",
        rule: BuiltinRule::MinLength,
    },
    RuleEntry {
        name: "min",
        rule: BuiltinRule::Min,
    },
    RuleEntry {
        name: "numeric",
        rule: BuiltinRule::Numeric,
    },
    RuleEntry {
        name: "regex",
        rule: BuiltinRule::Regex,
    },
    RuleEntry {
        name: "string",
        rule: BuiltinRule::String,
    },
];

/// Looks up a built-in rule by name, case-insensitively.
pub fn lookup_rule(name: &str) -> Option<BuiltinRule> {
    RULE_CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
        .map(|entry| entry.rule)
}

/// Creates and caches rule instances.
///
/// Meant to be built once by the host application and shared (behind an
/// `Arc`) by every [`Validator`](crate::validator::Validator). The shared
/// [`Predicates`] instance is created on the first successful lookup, and
/// each rule is instantiated at most once per lowercased name.
pub struct RuleRegistry {
    predicates: OnceLock<Arc<Predicates>>,
    rules: RwLock<HashMap<String, Arc<Rule>>>,
    localizer: Arc<dyn Localizer>,
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self
            .rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("RuleRegistry")
            .field("language", &self.localizer.language())
            .field("cached_rules", &cached)
            .finish()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::with_localizer(Arc::new(EnglishLocalizer))
    }

    /// A registry whose rules render default messages through `localizer`.
    pub fn with_localizer(localizer: Arc<dyn Localizer>) -> Self {
        Self {
            predicates: OnceLock::new(),
            rules: RwLock::new(HashMap::new()),
            localizer,
        }
    }

    pub fn localizer(&self) -> &dyn Localizer {
        self.localizer.as_ref()
    }

    /// The shared predicates instance, created on first use.
    pub fn predicates(&self) -> Arc<Predicates> {
        Arc::clone(self.predicates.get_or_init(|| Arc::new(Predicates::new())))
    }

    /// Resolves `name` to a shared rule instance.
    ///
    /// Returns `Ok(None)` for whitespace-only or unrecognised names; repeated
    /// calls for the same name (in any casing) return the same instance.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `name` is empty.
    pub fn create(&self, name: &str) -> Result<Option<Arc<Rule>>, ValidationError> {
        if name.is_empty() {
            return Err(Message::EmptyDirective.into());
        }
        if name.trim().is_empty() {
            return Ok(None);
        }
        let Some(kind) = lookup_rule(name) else {
            return Ok(None);
        };

        let key = name.to_ascii_lowercase();
        if let Some(rule) = self
            .rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Some(Arc::clone(rule)));
        }

        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        let rule = rules.entry(key).or_insert_with(|| {
            tracing::debug!(rule = kind.name(), "instantiating rule");
            Arc::new(Rule::new(
                kind,
                self.predicates(),
                Arc::clone(&self.localizer),
            ))
        });
        Ok(Some(Arc::clone(rule)))
    }
}
