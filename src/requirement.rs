//! Cross-field requirement resolution: `required` and
//! `requiredWithout:<field>`.
//!
//! Requirement directives are evaluated before, and removed from, a field's
//! ordinary rules. A field and the siblings it names in `requiredWithout` are
//! mutually exclusive alternatives: exactly one of them must be present.

use crate::accessor::FieldData;
use crate::error::ValidationError;
use crate::messages::Message;
use crate::meta_rule::MetaRule;

pub const REQUIRED: &str = "required";
pub const REQUIRED_WITHOUT: &str = "requiredWithout";

/// Whether `rule` is a `required` or `requiredWithout` directive.
pub fn is_requirement_rule(rule: &MetaRule) -> bool {
    rule.directive()
        .is_some_and(|d| d.is(REQUIRED) || d.is(REQUIRED_WITHOUT))
}

/// Formats sibling field names for messages: `'x'` for one field,
/// `one of 'x', 'y'` for several.
pub fn format_field_list(fields: &[String]) -> String {
    match fields {
        [single] => format!("'{}'", single),
        _ => {
            let quoted: Vec<String> = fields.iter().map(|f| format!("'{}'", f)).collect();
            format!("one of {}", quoted.join(", "))
        }
    }
}

/// The requirement directives found in one field's rule list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldRequirementConstraints {
    is_required: bool,
    required_without: Vec<String>,
}

impl FieldRequirementConstraints {
    /// Scans `rules` for `required` and `requiredWithout` directives.
    ///
    /// Sibling names are kept in declaration order, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a `requiredWithout` directive has
    /// no field name.
    pub fn from_meta_rules(rules: &[MetaRule]) -> Result<Self, ValidationError> {
        let mut constraints = Self::default();

        for directive in rules.iter().filter_map(MetaRule::directive) {
            if directive.is(REQUIRED) {
                constraints.is_required = true;
            } else if directive.is(REQUIRED_WITHOUT) {
                match directive.param.as_deref() {
                    Some(sibling) if !sibling.is_empty() => {
                        constraints.required_without.push(sibling.to_string());
                    }
                    _ => return Err(Message::RequiredWithoutNeedsField.into()),
                }
            }
        }

        Ok(constraints)
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn required_without(&self) -> &[String] {
        &self.required_without
    }

    pub fn has_required_without(&self) -> bool {
        !self.required_without.is_empty()
    }

    /// The `requiredWithout` siblings formatted with [`format_field_list`].
    pub fn format_required_without(&self) -> String {
        format_field_list(&self.required_without)
    }
}

/// Decides, for one field, whether validation fails outright, whether the
/// remaining rules are skipped, or whether they run.
#[derive(Debug)]
pub struct RequirementEngine<'a> {
    field: &'a str,
    constraints: FieldRequirementConstraints,
    data: &'a FieldData,
}

impl<'a> RequirementEngine<'a> {
    /// # Errors
    ///
    /// Propagates malformed `requiredWithout` directives.
    pub fn new(
        field: &'a str,
        rules: &[MetaRule],
        data: &'a FieldData,
    ) -> Result<Self, ValidationError> {
        let constraints =
            FieldRequirementConstraints::from_meta_rules(rules).map_err(|e| e.with_field(field))?;
        Ok(Self {
            field,
            constraints,
            data,
        })
    }

    pub fn constraints(&self) -> &FieldRequirementConstraints {
        &self.constraints
    }

    /// The rules left once requirement directives are removed, in order.
    pub fn filter_out_requirement_rules(rules: &[MetaRule]) -> Vec<&MetaRule> {
        rules.iter().filter(|rule| !is_requirement_rule(rule)).collect()
    }

    /// True when the field is absent and either optional or satisfiable by
    /// a sibling: there is no value to run the remaining rules against.
    pub fn should_skip_further_validation(&self) -> bool {
        !self.data.has_field(self.field)
            && (!self.constraints.is_required() || self.constraints.has_required_without())
    }

    /// Resolves the field's requirement constraints against the data.
    ///
    /// # Errors
    ///
    /// - `requiredWithout` naming the field itself;
    /// - the field is present together with one of its `requiredWithout`
    ///   siblings;
    /// - the field is `required` and absent;
    /// - the field is absent and so are all of its `requiredWithout` siblings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let siblings = self.constraints.required_without();

        if siblings.iter().any(|sibling| sibling == self.field) {
            return Err(ValidationError::from(Message::RequiredWithoutSelfReference)
                .with_field(self.field));
        }

        let any_sibling_present = siblings.iter().any(|sibling| self.data.has_field(sibling));

        if self.data.has_field(self.field) {
            if any_sibling_present {
                return Err(Message::OnlyOneFieldAllowed {
                    field: self.field.to_string(),
                    alternatives: self.constraints.format_required_without(),
                }
                .into());
            }
            return Ok(());
        }

        if self.constraints.is_required() {
            return Err(Message::RequiredFieldMissing {
                field: self.field.to_string(),
            }
            .into());
        }

        if self.constraints.has_required_without() && !any_sibling_present {
            return Err(Message::EitherFieldRequired {
                field: self.field.to_string(),
                alternatives: self.constraints.format_required_without(),
            }
            .into());
        }

        Ok(())
    }
}
