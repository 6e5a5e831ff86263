use fieldguard::compiled::{CompiledRules, CustomMessages, RuleSpecs};
use fieldguard::requirement::{format_field_list, is_requirement_rule};
use fieldguard::{
    ErrorKind, FieldData, FieldRequirementConstraints, MetaRule, RequirementEngine, RuleRegistry,
};
use serde_json::json;
use std::sync::Arc;

fn compile(specs: RuleSpecs) -> CompiledRules {
    CompiledRules::compile(
        &specs,
        Arc::new(CustomMessages::new()),
        Arc::new(RuleRegistry::new()),
    )
    .unwrap()
}

fn rules_of(directives: &[&str]) -> Vec<MetaRule> {
    let compiled = compile(RuleSpecs::new().field("f", directives.to_vec()));
    compiled.rules_for("f").unwrap().to_vec()
}

#[test]
fn constraints_collect_required_and_siblings_in_order() {
    let rules = rules_of(&["string", "requiredWithout:b", "REQUIRED", "requiredwithout:c"]);
    let constraints = FieldRequirementConstraints::from_meta_rules(&rules).unwrap();
    assert!(constraints.is_required());
    assert_eq!(constraints.required_without(), ["b", "c"]);
    assert_eq!(constraints.format_required_without(), "one of 'b', 'c'");
}

#[test]
fn constraints_keep_duplicate_siblings() {
    let rules = rules_of(&["requiredWithout:b", "requiredWithout:b"]);
    let constraints = FieldRequirementConstraints::from_meta_rules(&rules).unwrap();
    assert_eq!(constraints.required_without(), ["b", "b"]);
}

#[test]
fn constraints_reject_missing_sibling_name() {
    for directive in ["requiredWithout", "requiredWithout:", "requiredWithout:   "] {
        let rules = rules_of(&[directive]);
        let err = FieldRequirementConstraints::from_meta_rules(&rules).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Rule 'requiredWithout' must be used with a field name.",
            "{}",
            directive
        );
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}

#[test]
fn engine_construction_surfaces_malformed_directive() {
    let rules = rules_of(&["requiredWithout:"]);
    let data = FieldData::new(json!({}));
    let err = RequirementEngine::new("f", &rules, &data).unwrap_err();
    assert_eq!(err.field.as_deref(), Some("f"));
}

#[test]
fn field_list_formatting() {
    assert_eq!(format_field_list(&["x".to_string()]), "'x'");
    assert_eq!(
        format_field_list(&["x".to_string(), "y".to_string()]),
        "one of 'x', 'y'"
    );
}

#[test]
fn filter_out_requirement_rules_keeps_order() {
    let rules = rules_of(&["required", "integer", "requiredWithout:g", "min:3", "Required"]);
    let remaining: Vec<&str> = RequirementEngine::filter_out_requirement_rules(&rules)
        .into_iter()
        .map(MetaRule::name)
        .collect();
    assert_eq!(remaining, ["integer", "min"]);
    assert_eq!(rules.iter().filter(|r| is_requirement_rule(r)).count(), 3);
}

#[test]
fn absent_optional_field_is_skipped_silently() {
    let rules = rules_of(&["integer"]);
    let data = FieldData::new(json!({}));
    let engine = RequirementEngine::new("f", &rules, &data).unwrap();
    assert!(engine.validate().is_ok());
    assert!(engine.should_skip_further_validation());
}

#[test]
fn present_field_without_siblings_never_fails() {
    let rules = rules_of(&["required", "integer"]);
    let data = FieldData::new(json!({"f": "not even an integer"}));
    let engine = RequirementEngine::new("f", &rules, &data).unwrap();
    assert!(engine.validate().is_ok());
    assert!(!engine.should_skip_further_validation());
}

#[test]
fn absent_required_field_fails_and_is_not_skipped() {
    let rules = rules_of(&["required"]);
    let data = FieldData::new(json!({"other": 1}));
    let engine = RequirementEngine::new("f", &rules, &data).unwrap();
    let err = engine.validate().unwrap_err();
    assert_eq!(err.to_string(), "Required field 'f' is missing.");
    assert_eq!(err.kind, ErrorKind::Requirement);
    assert!(!engine.should_skip_further_validation());
}

#[test]
fn absent_field_satisfied_by_sibling() {
    let rules = rules_of(&["requiredWithout:g"]);
    let data = FieldData::new(json!({"g": 1}));
    let engine = RequirementEngine::new("f", &rules, &data).unwrap();
    assert!(engine.validate().is_ok());
    assert!(engine.should_skip_further_validation());
}

#[test]
fn absent_field_with_one_of_several_siblings_present() {
    let rules = rules_of(&["requiredWithout:g", "requiredWithout:h"]);
    let data = FieldData::new(json!({"h": 1}));
    let engine = RequirementEngine::new("f", &rules, &data).unwrap();
    assert!(engine.validate().is_ok());
}

#[test]
fn present_field_conflicts_with_any_present_sibling() {
    let rules = rules_of(&["requiredWithout:g", "requiredWithout:h"]);
    let data = FieldData::new(json!({"f": 1, "h": 1}));
    let engine = RequirementEngine::new("f", &rules, &data).unwrap();
    let err = engine.validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Only one of fields 'f' or one of 'g', 'h' can be present."
    );
}

#[test]
fn self_reference_fails_regardless_of_data() {
    let rules = rules_of(&["requiredWithout:f"]);
    for record in [json!({}), json!({"f": 1})] {
        let data = FieldData::new(record);
        let engine = RequirementEngine::new("f", &rules, &data).unwrap();
        let err = engine.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Rule 'requiredWithout' must not reference the field itself."
        );
    }
}

#[test]
fn nested_sibling_paths_are_resolved() {
    let rules = rules_of(&["requiredWithout:contact.phone"]);
    let data = FieldData::new(json!({"contact": {"phone": "555"}}));
    let engine = RequirementEngine::new("f", &rules, &data).unwrap();
    assert!(engine.validate().is_ok());

    let data = FieldData::new(json!({"contact": "none"}));
    let engine = RequirementEngine::new("f", &rules, &data).unwrap();
    assert_eq!(
        engine.validate().unwrap_err().to_string(),
        "Either field 'f' or 'contact.phone' must be present."
    );
}
