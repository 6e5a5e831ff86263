use super::common::load_cases;
use fieldguard::ValidatorConfig;
use serde_json::{Value, json};

#[derive(Debug, serde::Deserialize)]
struct ValidateCase {
    id: String,
    name: String,
    input: ValidateInput,
    expected: ValidateExpected,
}

#[derive(Debug, serde::Deserialize)]
struct ValidateInput {
    rules: Value,
    #[serde(default)]
    messages: Option<Value>,
    data: Value,
}

#[derive(Debug, serde::Deserialize)]
struct ValidateExpected {
    #[serde(default)]
    valid: bool,
    #[serde(default)]
    error: Option<String>,
}

#[test]
fn validate_suite() {
    let cases: Vec<ValidateCase> = load_cases("validate.yaml");
    assert!(!cases.is_empty());

    let mut failures = Vec::new();

    for case in &cases {
        let mut config = json!({ "rules": case.input.rules });
        if let Some(messages) = &case.input.messages {
            config["messages"] = messages.clone();
        }
        let config = ValidatorConfig::from_value(&config)
            .unwrap_or_else(|e| panic!("{}: bad config: {}", case.id, e));

        let result = fieldguard::validate(&config.rules, &config.messages, case.input.data.clone());

        let outcome_ok = match (&result, &case.expected.error) {
            (Ok(data), None) if case.expected.valid => *data.as_value() == case.input.data,
            (Err(err), Some(expected)) => err.to_string() == *expected,
            _ => false,
        };

        if !outcome_ok {
            failures.push(format!(
                "{} ({}): expected {:?}, got {:?}",
                case.id,
                case.name,
                case.expected,
                result.map(|d| d.into_inner())
            ));
        }
    }

    assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n"));
}
