//! Shared test utilities for the raidguard workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), so a `#[cfg(test)]` module inside
//! `raidguard-types` would not suffice.

use serde_json::Value;

const TIMESTAMP_KEYS: [&str; 4] = ["collected", "expires", "start", "end"];
const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
const ID_PLACEHOLDER: &str = "__ID__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Two concerns are handled separately:
///
/// 1. **Root-only**: when the root object looks like an execute result (has
///    `status`, `observations` and `findings`), the random `id` of every
///    observation and finding is replaced with `"__ID__"`, as are the entries
///    of each finding's `related_observations`. Subject ids are derived from
///    the policy and are left alone.
///
/// 2. **Recursive**: timestamp keys (`collected`, `expires`, `start`, `end`)
///    are normalized at any depth when their value is a string.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_execute_result = obj.contains_key("status")
            && obj.contains_key("observations")
            && obj.contains_key("findings");
        if is_execute_result {
            for key in ["observations", "findings"] {
                if let Some(Value::Array(records)) = obj.get_mut(key) {
                    records.iter_mut().for_each(normalize_record_ids);
                }
            }
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_record_ids(record: &mut Value) {
    let Some(map) = record.as_object_mut() else {
        return;
    };
    if map.contains_key("id") {
        map.insert("id".to_string(), placeholder(ID_PLACEHOLDER));
    }
    if let Some(Value::Array(related)) = map.get_mut("related_observations") {
        for id in related.iter_mut() {
            *id = placeholder(ID_PLACEHOLDER);
        }
    }
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(v) = map.get_mut(key)
                    && v.is_string()
                {
                    *v = placeholder(TIMESTAMP_PLACEHOLDER);
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

fn placeholder(text: &str) -> Value {
    Value::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_record_ids_and_timestamps_of_execute_result() {
        let input = json!({
            "status": "SUCCESS",
            "observations": [{
                "id": "0b7c6f0e-8f43-4f0e-a5a1-0e0f5f0b2f11",
                "collected": "2025-06-01T12:00:00Z",
                "expires": "2025-07-01T12:00:00Z",
                "props": [{ "name": "subject", "value": "raid-subject-00112233" }]
            }],
            "findings": [{
                "id": "4c1f3b0a-1d2e-4f5a-9b8c-7d6e5f4a3b2c",
                "related_observations": ["0b7c6f0e-8f43-4f0e-a5a1-0e0f5f0b2f11"]
            }],
            "logs": [{ "start": "2025-06-01T12:00:00Z", "end": "2025-06-01T12:00:01Z" }]
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["observations"][0]["id"], "__ID__");
        assert_eq!(result["findings"][0]["id"], "__ID__");
        assert_eq!(result["findings"][0]["related_observations"][0], "__ID__");
        assert_eq!(result["observations"][0]["collected"], "__TIMESTAMP__");
        assert_eq!(result["observations"][0]["expires"], "__TIMESTAMP__");
        assert_eq!(result["logs"][0]["start"], "__TIMESTAMP__");
        assert_eq!(result["logs"][0]["end"], "__TIMESTAMP__");

        // Subject references are deterministic and must survive.
        assert_eq!(
            result["observations"][0]["props"][0]["value"],
            "raid-subject-00112233"
        );
    }

    #[test]
    fn subject_ids_in_evaluate_result_not_normalized() {
        let input = json!({
            "subjects": [{ "id": "raid-subject-00112233", "type": "INVENTORY_ITEM" }]
        });

        let result = normalize_nondeterministic(input.clone());

        assert_eq!(result, input);
    }

    #[test]
    fn nested_result_like_object_keeps_ids() {
        let input = json!({
            "payload": {
                "status": "SUCCESS",
                "observations": [{ "id": "keep-me", "collected": "2025-06-01T12:00:00Z" }],
                "findings": []
            }
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["payload"]["observations"][0]["id"], "keep-me");
        // Timestamps are normalized at any depth.
        assert_eq!(
            result["payload"]["observations"][0]["collected"],
            "__TIMESTAMP__"
        );
    }

    #[test]
    fn non_string_timestamp_keys_untouched() {
        let input = json!({ "start": 3, "end": null });
        assert_eq!(normalize_nondeterministic(input.clone()), input);
    }
}
