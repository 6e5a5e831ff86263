//! The validation entry point: compile once, then walk fields in order and
//! stop at the first failure.

use crate::accessor::FieldData;
use crate::compiled::{CompiledRules, CustomMessages, RuleSpecs};
use crate::error::ValidationError;
use crate::meta_rule::MetaRule;
use crate::registry::RuleRegistry;
use crate::requirement::RequirementEngine;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Validates records against a fixed set of field rules.
#[derive(Clone, Debug)]
pub struct Validator {
    specs: RuleSpecs,
    messages: Arc<CustomMessages>,
    registry: Arc<RuleRegistry>,
}

impl Validator {
    /// A validator with no custom messages and a private rule registry.
    pub fn new(specs: RuleSpecs) -> Self {
        Self {
            specs,
            messages: Arc::new(CustomMessages::new()),
            registry: Arc::new(RuleRegistry::new()),
        }
    }

    pub fn with_messages(mut self, messages: CustomMessages) -> Self {
        self.messages = Arc::new(messages);
        self
    }

    /// Shares `registry` (and its cached rule instances) with this validator.
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn specs(&self) -> &RuleSpecs {
        &self.specs
    }

    pub fn messages(&self) -> &CustomMessages {
        &self.messages
    }

    /// Compiles the configured specs into meta-rules.
    pub fn compile(&self) -> Result<CompiledRules, ValidationError> {
        CompiledRules::compile(
            &self.specs,
            Arc::clone(&self.messages),
            Arc::clone(&self.registry),
        )
    }

    /// Validates one record.
    ///
    /// Fields are checked in declaration order: requirement directives first,
    /// then the remaining rules in the order given. Returns the record's
    /// accessor unchanged on success.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error, requirement failure, unknown
    /// rule or rule violation encountered. No further fields are inspected.
    pub fn validate(&self, data: Value) -> Result<FieldData, ValidationError> {
        let compiled = self.compile()?;
        let data = FieldData::new(data);

        tracing::debug!(fields = compiled.len(), "validating record");

        for (field, rules) in compiled.iter() {
            if let Err(error) = self.validate_field(field, rules, &data) {
                tracing::debug!(field, kind = ?error.kind, "validation failed");
                return Err(error);
            }
        }

        tracing::debug!(fields = compiled.len(), "record valid");
        Ok(data)
    }

    /// Validates any serializable value, e.g. a struct with named fields.
    pub fn validate_serializable<T: Serialize + ?Sized>(
        &self,
        data: &T,
    ) -> Result<FieldData, ValidationError> {
        let data = FieldData::from_serializable(data)?;
        self.validate(data.into_inner())
    }

    fn validate_field(
        &self,
        field: &str,
        rules: &[MetaRule],
        data: &FieldData,
    ) -> Result<(), ValidationError> {
        let requirement = RequirementEngine::new(field, rules, data)?;
        requirement.validate()?;

        if requirement.should_skip_further_validation() {
            tracing::trace!(field, "field absent, skipping remaining rules");
            return Ok(());
        }

        let value = data.get_field(field)?;
        for rule in RequirementEngine::filter_out_requirement_rules(rules) {
            rule.validate(field, value)?;
        }
        Ok(())
    }
}
