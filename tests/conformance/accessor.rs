use super::common::load_cases;
use fieldguard::{ErrorKind, FieldData};
use serde_json::{Value, json};

#[derive(Debug, serde::Deserialize)]
struct PathCase {
    id: String,
    name: String,
    input: PathInput,
    expected: PathExpected,
}

#[derive(Debug, serde::Deserialize)]
struct PathInput {
    path: String,
    record: Value,
}

#[derive(Debug, serde::Deserialize)]
struct PathExpected {
    found: bool,
    #[serde(default)]
    value: Value,
}

#[test]
fn field_path_suite() {
    let cases: Vec<PathCase> = load_cases("field_paths.yaml");
    assert!(!cases.is_empty());

    for case in &cases {
        let data = FieldData::new(case.input.record.clone());
        assert_eq!(
            data.has_field(&case.input.path),
            case.expected.found,
            "{} ({})",
            case.id,
            case.name
        );

        match data.get_field(&case.input.path) {
            Ok(value) => {
                assert!(case.expected.found, "{}: resolved unexpectedly", case.id);
                assert_eq!(value, &case.expected.value, "{} ({})", case.id, case.name);
            }
            Err(err) => {
                assert!(!case.expected.found, "{}: {}", case.id, err);
                assert_eq!(err.kind, ErrorKind::MissingField);
                assert_eq!(
                    err.message,
                    format!("Field '{}' does not exist.", case.input.path)
                );
            }
        }
    }
}

#[test]
fn get_field_on_scalar_parent_names_full_path() {
    let data = FieldData::new(json!({"user": 42}));
    let err = data.get_field("user.name").unwrap_err();
    assert_eq!(err.to_string(), "Field 'user.name' does not exist.");
    assert_eq!(err.field.as_deref(), Some("user.name"));
}

#[test]
fn get_field_nested_value() {
    let data = FieldData::new(json!({"user": {"name": "John"}}));
    assert_eq!(data.get_field("user.name").unwrap(), "John");
}

#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
struct Address {
    city: String,
    zip: u32,
}

#[test]
fn get_as_deserializes_subtree() {
    let data = FieldData::new(json!({"address": {"city": "Oslo", "zip": 150}}));
    let address: Address = data.get_as("address").unwrap();
    assert_eq!(
        address,
        Address {
            city: "Oslo".to_string(),
            zip: 150
        }
    );

    let err = data.get_as::<u32>("address.city").unwrap_err();
    assert_eq!(err.field.as_deref(), Some("address.city"));
}

#[test]
fn from_serializable_reads_struct_fields() {
    let data = FieldData::from_serializable(&Address {
        city: "Oslo".to_string(),
        zip: 150,
    })
    .unwrap();
    assert!(data.has_field("city"));
    assert_eq!(data.get_field("zip").unwrap(), 150);
    assert_eq!(data.into_inner(), json!({"city": "Oslo", "zip": 150}));
}
