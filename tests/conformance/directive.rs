use super::common::load_cases;
use fieldguard::parse_directive;

#[derive(Debug, serde::Deserialize)]
struct DirectiveCase {
    id: String,
    name: String,
    input: String,
    expected: DirectiveExpected,
}

#[derive(Debug, serde::Deserialize)]
struct DirectiveExpected {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    param: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[test]
fn directive_suite() {
    let cases: Vec<DirectiveCase> = load_cases("directives.yaml");
    assert!(!cases.is_empty());

    for case in &cases {
        let result = parse_directive(&case.input);
        match &case.expected.error {
            Some(message) => {
                let err = result.expect_err(&case.id);
                assert_eq!(&err.message, message, "{} ({})", case.id, case.name);
                assert_eq!(err.kind, fieldguard::ErrorKind::Configuration);
            }
            None => {
                let directive = result.unwrap_or_else(|e| panic!("{}: {}", case.id, e));
                assert_eq!(
                    Some(&directive.name),
                    case.expected.name.as_ref(),
                    "{} ({})",
                    case.id,
                    case.name
                );
                assert_eq!(directive.param, case.expected.param, "{} ({})", case.id, case.name);
            }
        }
    }
}

#[test]
fn directive_name_comparison_ignores_case() {
    let directive = parse_directive("MaxLength:4").unwrap();
    assert!(directive.is("maxlength"));
    assert!(directive.is("MAXLENGTH"));
    assert!(!directive.is("max"));
    assert_eq!(directive.name, "MaxLength");
}
