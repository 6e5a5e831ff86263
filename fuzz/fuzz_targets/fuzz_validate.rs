#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use fieldguard::{CustomMessages, RuleSpecs};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

const DIRECTIVES: &[&str] = &[
    "required",
    "requiredWithout:a",
    "requiredWithout:b",
    "requiredWithout:c",
    "string",
    "integer",
    "numeric",
    "email",
    "array",
    "file",
    "min:3",
    "max:10",
    "minLength:2",
    "maxLength:5",
    "regex:/^[a-z]+$/i",
    "datetime:Y-m-d",
];

const FIELDS: &[&str] = &["a", "b", "c", "a.b", "c.0"];

#[derive(Debug, Arbitrary)]
struct Input {
    rules: Vec<(u8, Vec<u8>, Option<String>)>,
    record: Vec<(u8, FuzzValue)>,
    message: Option<String>,
}

#[derive(Debug)]
struct FuzzValue(Value);

impl<'a> Arbitrary<'a> for FuzzValue {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        arbitrary_value(u, 2).map(FuzzValue)
    }
}

fn arbitrary_value(u: &mut Unstructured<'_>, depth: u32) -> arbitrary::Result<Value> {
    let upper = if depth == 0 { 4 } else { 6 };
    match u.int_in_range(0..=upper)? {
        0 => Ok(Value::Null),
        1 => Ok(Value::Bool(bool::arbitrary(u)?)),
        2 => Ok(Value::from(i64::arbitrary(u)?)),
        3 => Ok(serde_json::Number::from_f64(f64::arbitrary(u)?)
            .map(Value::Number)
            .unwrap_or(Value::Null)),
        4 => Ok(Value::String(String::arbitrary(u)?)),
        5 => {
            let len = u.int_in_range(0..=3)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Array(items))
        }
        _ => {
            let len = u.int_in_range(0..=3)?;
            let mut map = Map::new();
            for _ in 0..len {
                let key = FIELDS[u.choose_index(FIELDS.len())?];
                map.insert(key.to_string(), arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Object(map))
        }
    }
}

fuzz_target!(|input: Input| {
    let mut specs = RuleSpecs::new();
    for (field, picks, extra) in input.rules.iter().take(4) {
        let field = FIELDS[*field as usize % FIELDS.len()];
        let mut directives: Vec<String> = picks
            .iter()
            .take(6)
            .map(|p| DIRECTIVES[*p as usize % DIRECTIVES.len()].to_string())
            .collect();
        if let Some(extra) = extra {
            directives.push(extra.clone());
        }
        specs.insert(field, directives);
    }

    let mut record = Map::new();
    for (field, value) in input.record.into_iter().take(4) {
        let key = FIELDS[field as usize % FIELDS.len()];
        record.insert(key.to_string(), value.0);
    }
    let record = Value::Object(record);

    let mut messages = CustomMessages::new();
    if let Some(message) = &input.message {
        messages.insert("a.string", message.clone());
    }

    match fieldguard::validate(&specs, &messages, record.clone()) {
        Ok(data) => assert_eq!(data.into_inner(), record),
        Err(err) => assert!(!err.message.is_empty() || input.message.as_deref() == Some("")),
    }
});
