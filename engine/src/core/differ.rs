//! Ignore-aware structural comparison
//!
//! The expected tree drives the walk. A value equal to the ignore marker
//! removes that key from both trees, whatever the actual side holds. Keys that
//! only exist on the actual side are kept so they fail the comparison.

use serde_json::Value;
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// Default marker for "field need not match"
pub const IGNORE_SENTINEL: &str = "@Ignore@";

/// Both trees after ignored paths were removed
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub actual: Value,
    pub expected: Value,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.first_mismatch().is_none()
    }

    /// First differing path in expected-key order
    pub fn first_mismatch(&self) -> Option<Mismatch> {
        find_mismatch("$", &self.expected, &self.actual)
    }
}

/// A single structural difference; `None` marks a missing side
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub path: String,
    pub expected: Option<Value>,
    pub actual: Option<Value>,
}

impl Mismatch {
    pub fn expected_text(&self) -> String {
        describe(&self.expected)
    }

    pub fn actual_text(&self) -> String {
        describe(&self.actual)
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.path,
            self.expected_text(),
            self.actual_text()
        )
    }
}

fn describe(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<missing>".to_string(),
    }
}

/// Deep-copy both trees and strip every path the expected tree marks as ignored
pub fn scrub(actual: &Value, expected: &Value, marker: &str, max_depth: usize) -> EngineResult<Comparison> {
    let mut actual = actual.clone();
    let mut expected = expected.clone();

    if is_marker(&expected, marker) {
        return Ok(Comparison {
            actual: Value::Null,
            expected: Value::Null,
        });
    }

    let scrubber = Scrubber { marker, max_depth };
    scrubber.walk(&mut actual, &mut expected, 0)?;

    Ok(Comparison { actual, expected })
}

struct Scrubber<'a> {
    marker: &'a str,
    max_depth: usize,
}

impl Scrubber<'_> {
    fn walk(&self, actual: &mut Value, expected: &mut Value, depth: usize) -> EngineResult<()> {
        if depth >= self.max_depth {
            return Err(EngineError::malformed(
                "expected response",
                format!("nesting exceeds {} levels", self.max_depth),
            ));
        }

        match expected {
            Value::Object(expected_map) => {
                let ignored: Vec<String> = expected_map
                    .iter()
                    .filter(|(_, v)| is_marker(v, self.marker))
                    .map(|(k, _)| k.clone())
                    .collect();

                for key in &ignored {
                    expected_map.remove(key);
                    if let Value::Object(actual_map) = actual {
                        actual_map.remove(key);
                    }
                }

                for (key, expected_child) in expected_map.iter_mut() {
                    let actual_child = actual.as_object_mut().and_then(|m| m.get_mut(key));
                    if let Some(actual_child) = actual_child {
                        if same_family(actual_child, expected_child) {
                            self.walk(actual_child, expected_child, depth + 1)?;
                        }
                    }
                }
            }
            Value::Array(expected_items) => {
                // Array slots are blanked rather than removed so indexes stay aligned
                for (index, expected_child) in expected_items.iter_mut().enumerate() {
                    let actual_child = actual.as_array_mut().and_then(|items| items.get_mut(index));

                    if is_marker(expected_child, self.marker) {
                        *expected_child = Value::Null;
                        if let Some(actual_child) = actual_child {
                            *actual_child = Value::Null;
                        }
                    } else if let Some(actual_child) = actual_child {
                        if same_family(actual_child, expected_child) {
                            self.walk(actual_child, expected_child, depth + 1)?;
                        }
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }
}

fn is_marker(value: &Value, marker: &str) -> bool {
    matches!(value, Value::String(s) if s == marker)
}

fn same_family(actual: &Value, expected: &Value) -> bool {
    matches!(
        (actual, expected),
        (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_))
    )
}

fn find_mismatch(path: &str, expected: &Value, actual: &Value) -> Option<Mismatch> {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            for (key, expected_child) in expected_map {
                let child_path = format!("{path}.{key}");
                match actual_map.get(key) {
                    Some(actual_child) => {
                        if let Some(mismatch) = find_mismatch(&child_path, expected_child, actual_child) {
                            return Some(mismatch);
                        }
                    }
                    None => {
                        return Some(Mismatch {
                            path: child_path,
                            expected: Some(expected_child.clone()),
                            actual: None,
                        });
                    }
                }
            }

            actual_map
                .iter()
                .find(|(key, _)| !expected_map.contains_key(*key))
                .map(|(key, actual_child)| Mismatch {
                    path: format!("{path}.{key}"),
                    expected: None,
                    actual: Some(actual_child.clone()),
                })
        }
        (Value::Array(expected_items), Value::Array(actual_items)) => {
            let len = expected_items.len().max(actual_items.len());
            for index in 0..len {
                let child_path = format!("{path}[{index}]");
                match (expected_items.get(index), actual_items.get(index)) {
                    (Some(e), Some(a)) => {
                        if let Some(mismatch) = find_mismatch(&child_path, e, a) {
                            return Some(mismatch);
                        }
                    }
                    (e, a) => {
                        return Some(Mismatch {
                            path: child_path,
                            expected: e.cloned(),
                            actual: a.cloned(),
                        });
                    }
                }
            }
            None
        }
        (Value::Number(e), Value::Number(a)) if e.as_f64() == a.as_f64() => None,
        _ if expected == actual => None,
        _ => Some(Mismatch {
            path: path.to_string(),
            expected: Some(expected.clone()),
            actual: Some(actual.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scrub_default(actual: &Value, expected: &Value) -> Comparison {
        scrub(actual, expected, IGNORE_SENTINEL, 64).unwrap()
    }

    #[test]
    fn test_ignored_field_removed_from_both_sides() {
        let comparison = scrub_default(&json!({ "a": 999, "b": 1 }), &json!({ "a": "@Ignore@", "b": 1 }));

        assert_eq!(comparison.actual, json!({ "b": 1 }));
        assert_eq!(comparison.expected, json!({ "b": 1 }));
        assert!(comparison.is_match());
    }

    #[test]
    fn test_other_mismatches_survive() {
        let comparison = scrub_default(&json!({ "a": 999, "b": 2 }), &json!({ "a": "@Ignore@", "b": 1 }));

        assert!(!comparison.is_match());
        let mismatch = comparison.first_mismatch().unwrap();
        assert_eq!(mismatch.path, "$.b");
        assert_eq!(mismatch.to_string(), "$.b: expected 1, got 2");
    }

    #[test]
    fn test_ignore_applies_regardless_of_actual_type() {
        let actual = json!({ "meta": { "id": { "deep": [1, 2] }, "ts": null }, "status": "OK" });
        let expected = json!({ "meta": { "id": "@Ignore@", "ts": "@Ignore@" }, "status": "OK" });

        let comparison = scrub_default(&actual, &expected);
        assert_eq!(comparison.actual, json!({ "meta": {}, "status": "OK" }));
        assert!(comparison.is_match());
    }

    #[test]
    fn test_extra_actual_key_fails() {
        let comparison = scrub_default(&json!({ "a": 1, "extra": true }), &json!({ "a": 1 }));

        let mismatch = comparison.first_mismatch().unwrap();
        assert_eq!(mismatch.path, "$.extra");
        assert_eq!(mismatch.expected, None);
        assert_eq!(mismatch.to_string(), "$.extra: expected <missing>, got true");
    }

    #[test]
    fn test_missing_actual_key_fails() {
        let comparison = scrub_default(&json!({}), &json!({ "a": { "b": 1 } }));
        let mismatch = comparison.first_mismatch().unwrap();
        assert_eq!(mismatch.path, "$.a");
        assert_eq!(mismatch.actual, None);
    }

    #[test]
    fn test_ignore_inside_arrays_keeps_alignment() {
        let actual = json!({ "items": [ { "id": "x1", "qty": 2 }, "volatile", 3 ] });
        let expected = json!({ "items": [ { "id": "@Ignore@", "qty": 2 }, "@Ignore@", 3 ] });

        let comparison = scrub_default(&actual, &expected);
        assert_eq!(comparison.expected, json!({ "items": [ { "qty": 2 }, null, 3 ] }));
        assert!(comparison.is_match());
    }

    #[test]
    fn test_array_length_difference_reported() {
        let comparison = scrub_default(&json!([1, 2]), &json!([1, 2, 3]));
        let mismatch = comparison.first_mismatch().unwrap();
        assert_eq!(mismatch.path, "$[2]");
    }

    #[test]
    fn test_shape_mismatch_not_descended() {
        let comparison = scrub_default(&json!({ "a": [1] }), &json!({ "a": { "b": "@Ignore@" } }));
        // `a` was not walked because the shapes differ; the marker removal on
        // the expected side still happened at its own level only
        assert_eq!(comparison.expected, json!({ "a": { "b": "@Ignore@" } }));
        assert!(!comparison.is_match());
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let actual = json!({ "a": 1, "b": 2 });
        let expected = json!({ "a": "@Ignore@", "b": 2 });
        let _ = scrub_default(&actual, &expected);
        assert_eq!(actual, json!({ "a": 1, "b": 2 }));
        assert_eq!(expected, json!({ "a": "@Ignore@", "b": 2 }));
    }

    #[test]
    fn test_integer_and_float_forms_compare_equal() {
        let comparison = scrub_default(&json!({ "amount": 100.0 }), &json!({ "amount": 100 }));
        assert!(comparison.is_match());
    }

    #[test]
    fn test_custom_marker() {
        let comparison = scrub(&json!({ "a": 1 }), &json!({ "a": "*" }), "*", 64).unwrap();
        assert!(comparison.is_match());
    }

    #[test]
    fn test_root_marker_ignores_everything() {
        let comparison = scrub_default(&json!({ "anything": 1 }), &json!("@Ignore@"));
        assert!(comparison.is_match());
    }

    #[test]
    fn test_excessive_depth_is_malformed() {
        let mut expected = json!("leaf");
        let mut actual = json!("leaf");
        for _ in 0..10 {
            expected = json!({ "n": expected });
            actual = json!({ "n": actual });
        }

        let err = scrub(&actual, &expected, IGNORE_SENTINEL, 5).unwrap_err();
        assert!(err.is_malformed());
        assert!(scrub(&actual, &expected, IGNORE_SENTINEL, 64).is_ok());
    }
}
