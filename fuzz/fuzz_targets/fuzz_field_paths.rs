#![no_main]

use fieldguard::FieldData;
use fieldguard::accessor::resolve_field_path;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the split between path and JSON record.
    let split = data[0] as usize % data.len().max(1);
    let (path_bytes, value_bytes) = data.split_at(split.min(data.len()));

    let path = String::from_utf8_lossy(path_bytes);

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(value_bytes) {
        let resolved = resolve_field_path(&path, &value).is_some();
        let accessor = FieldData::new(value);
        assert_eq!(accessor.has_field(&path), resolved);
        assert_eq!(accessor.get_field(&path).is_ok(), resolved);
    }
});
