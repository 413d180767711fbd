use serde_json::Value;

/// Merge `overlay` onto `base`, field by field.
///
/// Objects merge recursively; scalars and whole arrays from the overlay win.
/// An explicit `null` in the overlay falls back to the base value, so a
/// sparse remote document never erases a default field.
pub(crate) fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let merged_value = match base_map.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        (_, Value::Null) => base.clone(),
        _ => overlay.clone(),
    }
}
