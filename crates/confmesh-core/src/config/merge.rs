//! Deep merge of resolved configuration values
//!
//! Every precedence layer (later files, environment overlay, runtime
//! overrides) is folded into the result with the same rule: mappings merge
//! key by key, anything else is replaced wholesale.

use serde_json::{Map, Value};

/// Deep merge `overlay` into `base`.
///
/// If both values are objects, merge them recursively with `overlay` taking
/// precedence. Otherwise, `overlay` replaces `base`.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            deep_merge_map(base_map, overlay_map);
        }
        (base, overlay) => {
            *base = overlay;
        }
    }
}

/// Deep merge two mappings, `overlay` winning on conflicting keys.
pub fn deep_merge_map(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, overlay_val) in overlay {
        match base.get_mut(&key) {
            Some(base_val) => deep_merge(base_val, overlay_val),
            None => {
                base.insert(key, overlay_val);
            }
        }
    }
}

/// Write `value` at the nested key path `segments` inside `map`.
///
/// Missing intermediate mappings are created; intermediate values that are
/// not mappings are replaced by one. An existing mapping at the final key is
/// deep-merged with `value` rather than replaced.
pub fn insert_path(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = map;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(inner) = entry else {
            return;
        };
        current = inner;
    }

    match current.get_mut(*last) {
        Some(existing) => deep_merge(existing, value),
        None => {
            current.insert(last.to_string(), value);
        }
    }
}
