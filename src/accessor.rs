//! Read-only access to one input record by dot-separated field path.

use crate::error::ValidationError;
use crate::messages::Message;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Resolves a dot-path against a value tree.
///
/// Each segment selects an object key verbatim, or an array element when the
/// segment is a non-negative decimal index. Returns `None` as soon as a
/// segment is absent or a non-terminal value is a scalar.
pub fn resolve_field_path<'a>(path: &str, record: &'a Value) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            Value::Object(obj) => obj.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// A validated (or about to be validated) input record.
///
/// Wraps the record without copying or mutating it; [`Validator::validate`]
/// hands back the same accessor it validated.
///
/// [`Validator::validate`]: crate::validator::Validator::validate
#[derive(Clone, Debug, PartialEq)]
pub struct FieldData {
    record: Value,
}

impl FieldData {
    pub fn new(record: Value) -> Self {
        Self { record }
    }

    /// Wraps any serializable Rust value, e.g. a struct with named fields.
    pub fn from_serializable<T: Serialize + ?Sized>(record: &T) -> Result<Self, ValidationError> {
        serde_json::to_value(record)
            .map(Self::new)
            .map_err(|e| ValidationError::configuration(format!("unserializable record: {}", e)))
    }

    /// Whether the full path resolves. A `null` stored under a key counts.
    pub fn has_field(&self, path: &str) -> bool {
        resolve_field_path(path, &self.record).is_some()
    }

    /// The value at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`MissingField`](crate::error::ErrorKind::MissingField)
    /// error naming `path` when resolution fails at any segment.
    pub fn get_field(&self, path: &str) -> Result<&Value, ValidationError> {
        resolve_field_path(path, &self.record).ok_or_else(|| {
            Message::FieldDoesNotExist {
                path: path.to_string(),
            }
            .into()
        })
    }

    /// Deserializes the value at `path` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ValidationError> {
        let value = self.get_field(path)?;
        T::deserialize(value).map_err(|e| {
            ValidationError::configuration(format!("Field '{}' has an unexpected shape: {}", path, e))
                .with_field(path)
        })
    }

    pub fn as_value(&self) -> &Value {
        &self.record
    }

    pub fn into_inner(self) -> Value {
        self.record
    }
}

impl From<Value> for FieldData {
    fn from(record: Value) -> Self {
        Self::new(record)
    }
}
