//! Field-by-field comparison of a predicted record against ground truth.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A leaf field whose predicted value differs from the expected one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    /// Dot-joined path of the field, e.g. `address.city`.
    pub path: String,
    /// Value found in the prediction ("" when absent).
    pub predicted: Value,
    /// Value found in the ground truth.
    pub expected: Value,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}: predicted = `{}`, expected = `{}`",
            self.path,
            leaf_text(&self.predicted),
            leaf_text(&self.expected)
        )
    }
}

/// Accuracy report for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Fraction of expected leaves that matched, 0.0 when there are none.
    pub accuracy: f64,
    /// Mismatching leaves in ground-truth order.
    pub mismatches: Vec<Mismatch>,
    /// Number of leaves in the ground truth.
    pub total: usize,
    /// Number of leaves that matched.
    pub correct: usize,
}

impl Comparison {
    /// Check if every expected leaf matched.
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Accuracy: {:.2}% ({}/{} fields matched)",
            self.accuracy * 100.0,
            self.correct,
            self.total
        )
    }
}

/// Compare a prediction against the expected record.
///
/// The walk follows the shape of `expected`: every mapping is descended in key
/// order and every non-mapping value is one scored leaf. Keys that only appear
/// in `predicted` are ignored. A missing or null `expected` scores nothing.
pub fn compare(predicted: &Value, expected: Option<&Value>) -> Comparison {
    let mut walk = Walk::default();

    match expected {
        None | Some(Value::Null) => {}
        Some(expected) => walk.visit(Some(predicted), expected, ""),
    }

    let accuracy = if walk.total > 0 {
        walk.correct as f64 / walk.total as f64
    } else {
        0.0
    };

    Comparison {
        accuracy,
        mismatches: walk.mismatches,
        total: walk.total,
        correct: walk.correct,
    }
}

#[derive(Default)]
struct Walk {
    mismatches: Vec<Mismatch>,
    total: usize,
    correct: usize,
}

impl Walk {
    fn visit(&mut self, predicted: Option<&Value>, expected: &Value, prefix: &str) {
        match expected {
            Value::Object(fields) => {
                for (key, child) in fields {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    // Non-mapping predictions have no children to look up.
                    let predicted_child = predicted.and_then(|p| p.get(key.as_str()));
                    self.visit(predicted_child, child, &path);
                }
            }
            leaf => {
                self.total += 1;
                let predicted = predicted.cloned().unwrap_or_else(|| Value::String(String::new()));

                if leaf_text(&predicted).trim() == leaf_text(leaf).trim() {
                    self.correct += 1;
                } else {
                    self.mismatches.push(Mismatch {
                        path: prefix.to_string(),
                        predicted,
                        expected: leaf.clone(),
                    });
                }
            }
        }
    }
}

// Strings compare by content, anything else (null included) by its JSON text.
fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_partial_match() {
        let result = compare(&json!({"a": "1"}), Some(&json!({"a": "1", "b": "2"})));

        assert_eq!(result.accuracy, 0.5);
        assert_eq!(result.total, 2);
        assert_eq!(result.correct, 1);
        assert_eq!(
            result.mismatches,
            vec![Mismatch {
                path: "b".to_string(),
                predicted: json!(""),
                expected: json!("2"),
            }]
        );
    }

    #[test]
    fn test_no_ground_truth() {
        let null = Value::Null;
        for expected in [None, Some(&null)] {
            let result = compare(&json!({"a": "1"}), expected);
            assert_eq!(result.accuracy, 0.0);
            assert_eq!(result.total, 0);
            assert_eq!(result.correct, 0);
            assert!(result.mismatches.is_empty());
            assert!(!result.is_perfect());
        }
    }

    #[test]
    fn test_nested_paths_in_expected_order() {
        let predicted = json!({
            "address": {"city": "Haifa", "street": "Herzl"},
            "dateOfBirth": {"day": "03", "month": "12", "year": "1988"}
        });
        let expected = json!({
            "dateOfBirth": {"day": "03", "month": "11", "year": "1988"},
            "address": {"street": "Herzel", "city": "Haifa"}
        });

        let result = compare(&predicted, Some(&expected));
        let paths: Vec<&str> = result.mismatches.iter().map(|m| m.path.as_str()).collect();

        assert_eq!(paths, vec!["dateOfBirth.month", "address.street"]);
        assert_eq!(result.total, 5);
        assert_eq!(result.correct, 3);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let result = compare(&json!({"name": "  Dana "}), Some(&json!({"name": "Dana"})));
        assert!(result.is_perfect());
        assert_eq!(result.accuracy, 1.0);
    }

    #[test]
    fn test_extra_predicted_fields_not_counted() {
        let result = compare(
            &json!({"a": "1", "extra": "x", "nested": {"y": "z"}}),
            Some(&json!({"a": "1"})),
        );
        assert_eq!(result.total, 1);
        assert_eq!(result.correct, 1);
    }

    #[test]
    fn test_missing_predicted_mapping() {
        let result = compare(
            &json!({"address": ""}),
            Some(&json!({"address": {"street": "", "city": "Haifa"}})),
        );

        assert_eq!(result.total, 2);
        assert_eq!(result.correct, 1);
        assert_eq!(result.mismatches[0].path, "address.city");
        assert_eq!(result.mismatches[0].predicted, json!(""));
    }

    #[test]
    fn test_non_string_leaves_compare_by_text() {
        let result = compare(&json!({"n": "5"}), Some(&json!({"n": 5})));
        assert!(result.is_perfect());
    }

    #[test]
    fn test_null_leaf_is_not_empty() {
        let result = compare(&json!({"a": ""}), Some(&json!({"a": null})));
        assert_eq!(result.total, 1);
        assert_eq!(result.correct, 0);
        assert_eq!(result.mismatches[0].expected, Value::Null);

        let result = compare(&json!({"a": null}), Some(&json!({"a": ""})));
        assert_eq!(result.correct, 0);
    }

    #[test]
    fn test_leaf_at_root() {
        let result = compare(&json!("x"), Some(&json!("y")));
        assert_eq!(result.total, 1);
        assert_eq!(result.mismatches[0].path, "");
    }

    #[test]
    fn test_display() {
        let result = compare(&json!({"a": "1"}), Some(&json!({"a": "1", "b": "2"})));

        assert_eq!(result.to_string(), "Accuracy: 50.00% (1/2 fields matched)");
        assert_eq!(
            result.mismatches[0].to_string(),
            "- b: predicted = ``, expected = `2`"
        );
    }
}
