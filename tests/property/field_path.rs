use fieldguard::FieldData;
use fieldguard::accessor::resolve_field_path;
use proptest::prelude::*;
use serde_json::{Value, json};

/// Strategy for arbitrary JSON values nested up to `depth` levels.
fn arb_json(depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| json!(i)),
        "[a-z]{1,8}".prop_map(Value::String),
    ];

    leaf.prop_recursive(depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z][a-z0-9_]{0,5}", inner), 1..5).prop_map(|pairs| {
                let map: serde_json::Map<String, Value> = pairs.into_iter().collect();
                Value::Object(map)
            }),
        ]
    })
}

/// Every resolvable dot-path in `value`, paired with the value it reaches.
fn extract_paths(value: &Value, prefix: &str, out: &mut Vec<(String, Value)>, max_depth: u32) {
    if max_depth == 0 {
        return;
    }
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", prefix, segment)
        }
    };
    match value {
        Value::Object(obj) => {
            for (key, child) in obj {
                let path = join(key);
                out.push((path.clone(), child.clone()));
                extract_paths(child, &path, out, max_depth - 1);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let path = join(&index.to_string());
                out.push((path.clone(), child.clone()));
                extract_paths(child, &path, out, max_depth - 1);
            }
        }
        _ => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn every_extracted_path_resolves_to_its_value(
        entries in prop::collection::vec(("[a-z][a-z0-9_]{0,5}", arb_json(3)), 1..5),
    ) {
        let record = Value::Object(entries.into_iter().collect());
        let mut paths = Vec::new();
        extract_paths(&record, "", &mut paths, 5);
        for (path, expected) in &paths {
            prop_assert_eq!(resolve_field_path(path, &record), Some(expected));
        }
    }

    #[test]
    fn has_field_agrees_with_resolution(
        path in "[a-z0-9]{1,4}(\\.[a-z0-9]{1,4}){0,3}",
        record in arb_json(3),
    ) {
        let data = FieldData::new(record.clone());
        prop_assert_eq!(data.has_field(&path), resolve_field_path(&path, &record).is_some());
        prop_assert_eq!(data.get_field(&path).is_ok(), data.has_field(&path));
    }

    #[test]
    fn scalars_have_no_children(scalar in arb_json(0), segment in "[a-z0-9]{1,6}") {
        let record = json!({ "leaf": scalar });
        let path = format!("leaf.{}", segment);
        prop_assert_eq!(resolve_field_path(&path, &record), None);
    }

    #[test]
    fn out_of_range_index_is_absent(items in prop::collection::vec(any::<i64>(), 0..8), extra in 0usize..4) {
        let record = json!({ "items": items.clone() });
        let path = format!("items.{}", items.len() + extra);
        prop_assert_eq!(resolve_field_path(&path, &record), None);
    }

    #[test]
    fn resolution_never_panics(path in "\\PC{0,30}", record in arb_json(2)) {
        let _ = resolve_field_path(&path, &record);
    }
}
