//! Default failure messages and the localization extension point.
//!
//! Every failure the engine can report is first built as a typed [`Message`].
//! Its `Display` impl is the English default; a [`Localizer`] installed on
//! the rule registry gets the first chance to render it in another language.

use crate::error::{ErrorKind, ValidationError};
use std::fmt;

/// A default failure message, before localization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    // ─── Configuration ──────────────────────────────────────────────────────
    EmptyDirective,
    PatternRequired { rule: String },
    DatetimeFormatRequired { rule: String },
    NumericParamRequired { rule: String },
    RequiredWithoutNeedsField,
    RequiredWithoutSelfReference,

    // ─── Lookup ─────────────────────────────────────────────────────────────
    UnknownRule { name: String },
    FieldDoesNotExist { path: String },

    // ─── Requirement ────────────────────────────────────────────────────────
    RequiredFieldMissing { field: String },
    EitherFieldRequired { field: String, alternatives: String },
    OnlyOneFieldAllowed { field: String, alternatives: String },

    // ─── Rule violations ────────────────────────────────────────────────────
    NotString { field: String },
    NotInteger { field: String },
    NotNumeric { field: String },
    NotEmail { field: String },
    NotArray { field: String },
    NotUploadedFile { field: String },
    PatternMismatch { field: String, pattern: String },
    DatetimeMismatch { field: String, format: String },
    BelowMinimum { field: String, min: String },
    AboveMaximum { field: String, max: String },
    TooShort { field: String, min: String },
    TooLong { field: String, max: String },
    UploadFailed { field: String, code: i64 },
    CustomValidationFailed { field: String },
}

impl Message {
    /// The error kind a failure carrying this message belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Message::EmptyDirective
            | Message::PatternRequired { .. }
            | Message::DatetimeFormatRequired { .. }
            | Message::NumericParamRequired { .. }
            | Message::RequiredWithoutNeedsField => ErrorKind::Configuration,
            Message::RequiredWithoutSelfReference
            | Message::RequiredFieldMissing { .. }
            | Message::EitherFieldRequired { .. }
            | Message::OnlyOneFieldAllowed { .. } => ErrorKind::Requirement,
            Message::UnknownRule { .. } => ErrorKind::UnknownRule,
            Message::FieldDoesNotExist { .. } => ErrorKind::MissingField,
            _ => ErrorKind::RuleViolation,
        }
    }

    /// The field path the message is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Message::FieldDoesNotExist { path } => Some(path),
            Message::RequiredFieldMissing { field }
            | Message::EitherFieldRequired { field, .. }
            | Message::OnlyOneFieldAllowed { field, .. }
            | Message::NotString { field }
            | Message::NotInteger { field }
            | Message::NotNumeric { field }
            | Message::NotEmail { field }
            | Message::NotArray { field }
            | Message::NotUploadedFile { field }
            | Message::PatternMismatch { field, .. }
            | Message::DatetimeMismatch { field, .. }
            | Message::BelowMinimum { field, .. }
            | Message::AboveMaximum { field, .. }
            | Message::TooShort { field, .. }
            | Message::TooLong { field, .. }
            | Message::UploadFailed { field, .. }
            | Message::CustomValidationFailed { field } => Some(field),
            _ => None,
        }
    }

    /// Renders the message through `localizer`, falling back to English.
    pub fn render(&self, localizer: &dyn Localizer) -> String {
        localizer
            .translate(self)
            .unwrap_or_else(|| self.to_string())
    }

    /// Builds the error for this message, rendered through `localizer`.
    pub fn localized_error(&self, localizer: &dyn Localizer) -> ValidationError {
        let error = ValidationError::new(self.kind(), self.render(localizer));
        match self.field() {
            Some(field) => error.with_field(field),
            None => error,
        }
    }
}

impl From<Message> for ValidationError {
    fn from(message: Message) -> Self {
        message.localized_error(&EnglishLocalizer)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::EmptyDirective => write!(f, "Rule must be a non-empty string."),
            Message::PatternRequired { rule } => {
                write!(f, "Rule '{}' must be used with a valid pattern.", rule)
            }
            Message::DatetimeFormatRequired { rule } => {
                write!(f, "Rule '{}' must be used with a valid datetime format.", rule)
            }
            Message::NumericParamRequired { rule } => {
                write!(f, "Rule '{}' must be used with a numeric parameter.", rule)
            }
            Message::RequiredWithoutNeedsField => {
                write!(f, "Rule 'requiredWithout' must be used with a field name.")
            }
            Message::RequiredWithoutSelfReference => {
                write!(f, "Rule 'requiredWithout' must not reference the field itself.")
            }
            Message::UnknownRule { name } => write!(f, "Unknown rule '{}'.", name),
            Message::FieldDoesNotExist { path } => write!(f, "Field '{}' does not exist.", path),
            Message::RequiredFieldMissing { field } => {
                write!(f, "Required field '{}' is missing.", field)
            }
            Message::EitherFieldRequired {
                field,
                alternatives,
            } => write!(
                f,
                "Either field '{}' or {} must be present.",
                field, alternatives
            ),
            Message::OnlyOneFieldAllowed {
                field,
                alternatives,
            } => write!(
                f,
                "Only one of fields '{}' or {} can be present.",
                field, alternatives
            ),
            Message::NotString { field } => write!(f, "Field '{}' must be a string.", field),
            Message::NotInteger { field } => write!(f, "Field '{}' must be an integer.", field),
            Message::NotNumeric { field } => write!(f, "Field '{}' must be numeric.", field),
            Message::NotEmail { field } => {
                write!(f, "Field '{}' must be a valid email address.", field)
            }
            Message::NotArray { field } => write!(f, "Field '{}' must be an array.", field),
            Message::NotUploadedFile { field } => {
                write!(f, "Field '{}' must be a valid uploaded file.", field)
            }
            Message::PatternMismatch { field, pattern } => {
                write!(f, "Field '{}' must match the pattern {}.", field, pattern)
            }
            Message::DatetimeMismatch { field, format } => write!(
                f,
                "Field '{}' must be a datetime in the format '{}'.",
                field, format
            ),
            Message::BelowMinimum { field, min } => {
                write!(f, "Field '{}' must have a minimum value of {}.", field, min)
            }
            Message::AboveMaximum { field, max } => {
                write!(f, "Field '{}' must have a maximum value of {}.", field, max)
            }
            Message::TooShort { field, min } => write!(
                f,
                "Field '{}' must be at least {} characters long.",
                field, min
            ),
            Message::TooLong { field, max } => write!(
                f,
                "Field '{}' must not be longer than {} characters.",
                field, max
            ),
            Message::UploadFailed { field, code } => {
                write!(f, "Field '{}': {}", field, upload_error_text(*code))
            }
            Message::CustomValidationFailed { field } => {
                write!(f, "Field '{}' failed custom validation.", field)
            }
        }
    }
}

/// English description of a non-success upload error code.
pub fn upload_error_text(code: i64) -> String {
    match code {
        1 | 2 => "the uploaded file exceeds the maximum allowed size.".to_string(),
        3 => "the file was only partially uploaded.".to_string(),
        4 => "no file was uploaded.".to_string(),
        6 => "missing a temporary folder for the upload.".to_string(),
        7 => "failed to write the uploaded file to disk.".to_string(),
        8 => "a server extension stopped the file upload.".to_string(),
        other => format!("unknown upload error: {}", other),
    }
}

/// Extension point for rendering default messages in the active language.
///
/// Implementations return `None` for messages they have no translation for;
/// the English default is used in that case.
pub trait Localizer: Send + Sync {
    /// The active language code, e.g. `"en"`.
    fn language(&self) -> &str;

    /// Renders `message` in the active language.
    fn translate(&self, message: &Message) -> Option<String>;
}

/// The built-in localizer: English, no translations.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishLocalizer;

impl Localizer for EnglishLocalizer {
    fn language(&self) -> &str {
        "en"
    }

    fn translate(&self, _message: &Message) -> Option<String> {
        None
    }
}
