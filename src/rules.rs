//! Built-in rule implementations.
//!
//! The set of built-ins is closed: each is a [`BuiltinRule`] variant, and a
//! [`Rule`] pairs a variant with the shared [`Predicates`] instance and the
//! registry's [`Localizer`]. Rules are stateless and safe to share.

use crate::error::ValidationError;
use crate::messages::{Localizer, Message};
use crate::primitives::{Predicates, UPLOAD_OK};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The built-in rules, one per catalog name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinRule {
    Array,
    Datetime,
    Email,
    File,
    Integer,
    MaxLength,
    Max,
    MinLength,
    Min,
    Numeric,
    Regex,
    String,
}

impl BuiltinRule {
    /// The canonical directive name.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinRule::Array => "array",
            BuiltinRule::Datetime => "datetime",
            BuiltinRule::Email => "email",
            BuiltinRule::File => "file",
            BuiltinRule::Integer => "integer",
            BuiltinRule::MaxLength => "maxLength",
            BuiltinRule::Max => "max",
            BuiltinRule::MinLength => "minLength",
            BuiltinRule::Min => "min",
            BuiltinRule::Numeric => "numeric",
            BuiltinRule::Regex => "regex",
            BuiltinRule::String => "string",
        }
    }
}

impl fmt::Display for BuiltinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A built-in rule bound to its shared collaborators.
pub struct Rule {
    kind: BuiltinRule,
    predicates: Arc<Predicates>,
    localizer: Arc<dyn Localizer>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("language", &self.localizer.language())
            .finish()
    }
}

impl Rule {
    pub fn new(
        kind: BuiltinRule,
        predicates: Arc<Predicates>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            kind,
            predicates,
            localizer,
        }
    }

    pub fn kind(&self) -> BuiltinRule {
        self.kind
    }

    pub fn predicates(&self) -> &Arc<Predicates> {
        &self.predicates
    }

    /// Validates one field value against the optional directive parameter.
    ///
    /// # Errors
    ///
    /// Returns a rule violation naming `field` and the violated constraint,
    /// or a configuration error when `param` is missing or malformed.
    pub fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
    ) -> Result<(), ValidationError> {
        let outcome = match self.kind {
            BuiltinRule::String => self.check(self.predicates.is_string(value), || {
                Message::NotString {
                    field: field.to_string(),
                }
            }),
            BuiltinRule::Integer => self.check(self.predicates.is_integer(value), || {
                Message::NotInteger {
                    field: field.to_string(),
                }
            }),
            BuiltinRule::Numeric => self.check(self.predicates.is_numeric(value), || {
                Message::NotNumeric {
                    field: field.to_string(),
                }
            }),
            BuiltinRule::Email => self.check(self.predicates.is_email(value), || {
                Message::NotEmail {
                    field: field.to_string(),
                }
            }),
            BuiltinRule::Array => self.check(self.predicates.is_array(value), || {
                Message::NotArray {
                    field: field.to_string(),
                }
            }),
            BuiltinRule::Regex => self.validate_regex(field, value, param),
            BuiltinRule::Datetime => self.validate_datetime(field, value, param),
            BuiltinRule::Min | BuiltinRule::Max => self.validate_bound(field, value, param),
            BuiltinRule::MinLength | BuiltinRule::MaxLength => {
                self.validate_length(field, value, param)
            }
            BuiltinRule::File => self.validate_file(field, value),
        };

        outcome.map_err(|message| message.localized_error(self.localizer.as_ref()))
    }

    fn check(&self, passed: bool, message: impl FnOnce() -> Message) -> Result<(), Message> {
        if passed { Ok(()) } else { Err(message()) }
    }

    fn validate_regex(&self, field: &str, value: &Value, param: Option<&str>) -> Result<(), Message> {
        let subject = value.as_str().ok_or_else(|| Message::NotString {
            field: field.to_string(),
        })?;
        let pattern = param.filter(|p| !p.is_empty()).ok_or_else(|| Message::PatternRequired {
            rule: self.kind.name().to_string(),
        })?;
        let matched = self
            .predicates
            .matches_pattern(subject, pattern)
            .ok_or_else(|| Message::PatternRequired {
                rule: self.kind.name().to_string(),
            })?;

        self.check(matched, || Message::PatternMismatch {
            field: field.to_string(),
            pattern: pattern.to_string(),
        })
    }

    fn validate_datetime(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
    ) -> Result<(), Message> {
        let subject = value.as_str().ok_or_else(|| Message::NotString {
            field: field.to_string(),
        })?;
        let format = param
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Message::DatetimeFormatRequired {
                rule: self.kind.name().to_string(),
            })?;

        let matched = self
            .predicates
            .matches_datetime_format(subject, format)
            .ok_or_else(|| Message::DatetimeFormatRequired {
                rule: self.kind.name().to_string(),
            })?;

        self.check(matched, || Message::DatetimeMismatch {
            field: field.to_string(),
            format: format.to_string(),
        })
    }

    fn validate_bound(&self, field: &str, value: &Value, param: Option<&str>) -> Result<(), Message> {
        let actual = self
            .predicates
            .as_number(value)
            .ok_or_else(|| Message::NotNumeric {
                field: field.to_string(),
            })?;
        let (bound, raw) = self.numeric_param(param)?;

        match self.kind {
            BuiltinRule::Min => self.check(actual >= bound, || Message::BelowMinimum {
                field: field.to_string(),
                min: raw.to_string(),
            }),
            _ => self.check(actual <= bound, || Message::AboveMaximum {
                field: field.to_string(),
                max: raw.to_string(),
            }),
        }
    }

    fn validate_length(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
    ) -> Result<(), Message> {
        let subject = value.as_str().ok_or_else(|| Message::NotString {
            field: field.to_string(),
        })?;
        let (bound, raw) = self.numeric_param(param)?;
        let length = subject.chars().count() as f64;

        match self.kind {
            BuiltinRule::MinLength => self.check(length >= bound, || Message::TooShort {
                field: field.to_string(),
                min: raw.to_string(),
            }),
            _ => self.check(length <= bound, || Message::TooLong {
                field: field.to_string(),
                max: raw.to_string(),
            }),
        }
    }

    fn numeric_param<'p>(&self, param: Option<&'p str>) -> Result<(f64, &'p str), Message> {
        param
            .and_then(|raw| self.predicates.parse_numeric_str(raw).map(|n| (n, raw)))
            .ok_or_else(|| Message::NumericParamRequired {
                rule: self.kind.name().to_string(),
            })
    }

    fn validate_file(&self, field: &str, value: &Value) -> Result<(), Message> {
        if let Some(code) = self.predicates.upload_error_code(value)
            && code != UPLOAD_OK
        {
            return Err(Message::UploadFailed {
                field: field.to_string(),
                code,
            });
        }

        self.check(self.predicates.is_uploaded_file(value), || {
            Message::NotUploadedFile {
                field: field.to_string(),
            }
        })
    }
}
