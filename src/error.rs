use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification of a validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed rule specification, detected before any data is inspected.
    Configuration,
    /// Missing required field or conflicting mutually-exclusive fields.
    Requirement,
    /// A rule implementation rejected a field value.
    RuleViolation,
    /// A directive names a rule absent from the registry.
    UnknownRule,
    /// A path lookup on the data accessor did not resolve.
    MissingField,
}

/// The single error produced by a failed validation run.
///
/// Validation is fail-fast: the first violated rule ends the run and its
/// message is the complete feedback. `Display` prints only the message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Attach the field path the error refers to.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Replace the message, keeping kind and field.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}
