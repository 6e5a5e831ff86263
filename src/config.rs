use crate::compiled::{CustomMessages, RuleSpec, RuleSpecs};
use crate::error::ValidationError;
use crate::registry::RuleRegistry;
use crate::validator::Validator;
use serde_json::Value;
use std::sync::Arc;

/// Field rules and custom messages loaded from a configuration document.
///
/// ```yaml
/// rules:
///   email: email
///   age: [integer, "min:18"]
/// messages:
///   age.min: "You must be an adult."
/// ```
///
/// Only directive strings can be configured this way; predicates are
/// attached in code through [`RuleSpecs`].
#[derive(Clone, Debug, Default)]
pub struct ValidatorConfig {
    pub rules: RuleSpecs,
    pub messages: CustomMessages,
}

impl ValidatorConfig {
    /// Parses a YAML configuration document.
    ///
    /// Field order follows document order.
    pub fn from_yaml(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::configuration("empty configuration"));
        }

        let value: Value = serde_saphyr::from_str(input).map_err(|e| {
            ValidationError::configuration(format!("invalid configuration: {}", e))
        })?;
        Self::from_value(&value)
    }

    /// Builds a configuration from an already-parsed JSON/YAML value.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let root = value
            .as_object()
            .ok_or_else(|| ValidationError::configuration("configuration root must be a mapping"))?;

        for key in root.keys() {
            match key.as_str() {
                "rules" | "messages" => {}
                other => {
                    return Err(ValidationError::configuration(format!(
                        "unknown configuration key: {}",
                        other
                    )));
                }
            }
        }

        let mut config = Self::default();

        if let Some(rules) = root.get("rules") {
            let rules = rules
                .as_object()
                .ok_or_else(|| ValidationError::configuration("'rules' must be a mapping"))?;
            for (field, spec) in rules {
                config.rules.insert(field.clone(), rule_spec_from_value(field, spec)?);
            }
        }

        if let Some(messages) = root.get("messages") {
            let messages = messages
                .as_object()
                .ok_or_else(|| ValidationError::configuration("'messages' must be a mapping"))?;
            for (key, message) in messages {
                let message = message.as_str().ok_or_else(|| {
                    ValidationError::configuration(format!("message '{}' must be a string", key))
                })?;
                config.messages.insert(key, message);
            }
        }

        Ok(config)
    }

    pub fn into_validator(self, registry: Arc<RuleRegistry>) -> Validator {
        Validator::new(self.rules)
            .with_messages(self.messages)
            .with_registry(registry)
    }
}

fn rule_spec_from_value(field: &str, spec: &Value) -> Result<RuleSpec, ValidationError> {
    let invalid = || {
        ValidationError::configuration(format!(
            "rules for field '{}' must be a string or a list of strings",
            field
        ))
        .with_field(field)
    };

    match spec {
        Value::String(directive) => Ok(RuleSpec::from(directive.as_str())),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| entry.as_str().ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}
