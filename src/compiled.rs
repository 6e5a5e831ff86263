//! Rule specifications and their compiled, per-run form.

use crate::directive::parse_directive;
use crate::error::ValidationError;
use crate::meta_rule::{MetaRule, Predicate, PredicateOutcome};
use crate::registry::RuleRegistry;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

// ─── Rule specifications ─────────────────────────────────────────────────────

/// One entry of a field's rule specification.
#[derive(Clone, Debug)]
pub enum SpecEntry {
    Directive(String),
    Predicate(Predicate),
}

impl From<&str> for SpecEntry {
    fn from(directive: &str) -> Self {
        SpecEntry::Directive(directive.to_string())
    }
}

impl From<String> for SpecEntry {
    fn from(directive: String) -> Self {
        SpecEntry::Directive(directive)
    }
}

impl From<Predicate> for SpecEntry {
    fn from(predicate: Predicate) -> Self {
        SpecEntry::Predicate(predicate)
    }
}

/// A field's rules, in the order they run.
///
/// Built from a single directive, a single predicate, or a list mixing both.
#[derive(Clone, Debug, Default)]
pub struct RuleSpec(Vec<SpecEntry>);

impl RuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spec holding a single custom predicate.
    pub fn predicate<F, R>(f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: PredicateOutcome,
    {
        Self(vec![SpecEntry::Predicate(Predicate::new(f))])
    }

    /// Appends an entry.
    pub fn then(mut self, entry: impl Into<SpecEntry>) -> Self {
        self.0.push(entry.into());
        self
    }

    /// Appends a custom predicate.
    pub fn then_predicate<F, R>(self, f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: PredicateOutcome,
    {
        self.then(Predicate::new(f))
    }

    pub fn entries(&self) -> &[SpecEntry] {
        &self.0
    }
}

impl From<SpecEntry> for RuleSpec {
    fn from(entry: SpecEntry) -> Self {
        Self(vec![entry])
    }
}

impl From<&str> for RuleSpec {
    fn from(directive: &str) -> Self {
        SpecEntry::from(directive).into()
    }
}

impl From<String> for RuleSpec {
    fn from(directive: String) -> Self {
        SpecEntry::from(directive).into()
    }
}

impl From<Predicate> for RuleSpec {
    fn from(predicate: Predicate) -> Self {
        SpecEntry::from(predicate).into()
    }
}

impl<T: Into<SpecEntry>> FromIterator<T> for RuleSpec {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SpecEntry>, const N: usize> From<[T; N]> for RuleSpec {
    fn from(entries: [T; N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<T: Into<SpecEntry>> From<Vec<T>> for RuleSpec {
    fn from(entries: Vec<T>) -> Self {
        entries.into_iter().collect()
    }
}

/// Field path → rule specification, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct RuleSpecs {
    fields: Vec<(String, RuleSpec)>,
}

impl RuleSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RuleSpecs::insert`].
    pub fn field(mut self, path: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.insert(path, spec);
        self
    }

    /// Sets the spec for `path`. Re-declaring a field replaces its spec but
    /// keeps its original position.
    pub fn insert(&mut self, path: impl Into<String>, spec: impl Into<RuleSpec>) {
        let path = path.into();
        let spec = spec.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == path) {
            Some((_, slot)) => *slot = spec,
            None => self.fields.push((path, spec)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&RuleSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, spec)| spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(path, spec)| (path.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ─── Custom messages ─────────────────────────────────────────────────────────

/// Per-field overrides of rule failure messages, keyed `"<field>.<rule>"`.
///
/// The rule part (after the last `.`) is matched case-insensitively; the
/// field part is matched exactly, so nested paths like `user.name.regex`
/// work.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomMessages {
    messages: HashMap<String, String>,
}

impl CustomMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`CustomMessages::insert`].
    pub fn with(mut self, key: impl AsRef<str>, message: impl Into<String>) -> Self {
        self.insert(key, message);
        self
    }

    pub fn insert(&mut self, key: impl AsRef<str>, message: impl Into<String>) {
        self.messages
            .insert(normalize_message_key(key.as_ref()), message.into());
    }

    /// The override for `rule` failures on `field`, if configured.
    pub fn get(&self, field: &str, rule: &str) -> Option<&str> {
        self.messages
            .get(&format!("{}.{}", field, rule.to_ascii_lowercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for CustomMessages {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut messages = Self::new();
        for (key, message) in iter {
            messages.insert(key, message);
        }
        messages
    }
}

fn normalize_message_key(key: &str) -> String {
    match key.rsplit_once('.') {
        Some((field, rule)) => format!("{}.{}", field, rule.to_ascii_lowercase()),
        None => key.to_string(),
    }
}

// ─── Compiled rules ──────────────────────────────────────────────────────────

/// Field path → ordered meta-rules, built once per validation run.
#[derive(Clone, Debug)]
pub struct CompiledRules {
    fields: Vec<(String, Vec<MetaRule>)>,
}

impl CompiledRules {
    /// Compiles every field's spec: predicates become custom meta-rules,
    /// directive strings are parsed into standard ones.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a blank directive string.
    pub fn compile(
        specs: &RuleSpecs,
        messages: Arc<CustomMessages>,
        registry: Arc<RuleRegistry>,
    ) -> Result<Self, ValidationError> {
        let mut fields = Vec::with_capacity(specs.len());

        for (path, spec) in specs.iter() {
            let mut meta_rules = Vec::with_capacity(spec.entries().len());
            for entry in spec.entries() {
                let meta_rule = match entry {
                    SpecEntry::Predicate(predicate) => MetaRule::custom(predicate.clone()),
                    SpecEntry::Directive(raw) => {
                        let directive =
                            parse_directive(raw).map_err(|e| e.with_field(path))?;
                        MetaRule::standard(directive, Arc::clone(&registry), Arc::clone(&messages))
                    }
                };
                meta_rules.push(meta_rule);
            }
            fields.push((path.to_string(), meta_rules));
        }

        Ok(Self { fields })
    }

    /// The meta-rules for `path`, in declaration order.
    pub fn rules_for(&self, path: &str) -> Option<&[MetaRule]> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, rules)| rules.as_slice())
    }

    /// Fields and their meta-rules, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MetaRule])> {
        self.fields
            .iter()
            .map(|(path, rules)| (path.as_str(), rules.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
