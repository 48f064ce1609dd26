//! Decision-record grammar and positional record comparison.
//!
//! One record per line, two-level delimiting:
//!
//! ```text
//! <action> <unit-key> <probability> | <context>
//! ```
//!
//! The first bar splits the decision group from the context group; the
//! decision group must contain exactly three whitespace-separated tokens.
//! A malformed record fails the whole scenario rather than being skipped:
//! the grammar is part of the conformance contract, so a line that does not
//! parse is itself a conformance failure.

use crate::compare::significant_lines;
use crate::core::errors::{HarnessError, Result};

/// One parsed decision record.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    /// Chosen action id.
    pub action: u32,
    /// Experimental-unit key the decision was made for.
    pub unit_key: String,
    /// Selection probability of the chosen action.
    pub probability: f64,
    /// Context digest, compared verbatim after trimming.
    pub context: String,
}

/// Parse one non-blank line as a decision record.
///
/// Errors carry a grammar-level description; the caller adds case and line
/// context.
pub fn parse_record(line: &str) -> std::result::Result<DecisionRecord, String> {
    let Some((decision_group, context_group)) = line.split_once('|') else {
        return Err("missing '|' separator between decision and context".to_string());
    };

    let tokens: Vec<&str> = decision_group.split_whitespace().collect();
    let [action_token, key_token, probability_token] = tokens.as_slice() else {
        return Err(format!(
            "decision group has {} tokens, expected 3 (action, key, probability)",
            tokens.len()
        ));
    };

    let action = action_token
        .parse::<u32>()
        .map_err(|error| format!("action {action_token:?} is not an unsigned integer: {error}"))?;
    let probability = probability_token
        .parse::<f64>()
        .map_err(|error| format!("probability {probability_token:?} is not a float: {error}"))?;

    Ok(DecisionRecord {
        action,
        unit_key: (*key_token).to_string(),
        probability,
        context: context_group.trim().to_string(),
    })
}

/// Compare two record sequences positionally.
///
/// Both implementations must agree on record order; action, key, and context
/// are compared exactly, probability within `probability_epsilon`.
pub fn compare_records(
    case_index: usize,
    expected: &str,
    actual: &str,
    probability_epsilon: f64,
) -> Result<()> {
    let expected_records = parse_records(case_index, expected, "expected")?;
    let actual_records = parse_records(case_index, actual, "actual")?;

    if expected_records.len() != actual_records.len() {
        return Err(HarnessError::LengthMismatch {
            case_index,
            expected: expected_records.len(),
            actual: actual_records.len(),
        });
    }

    for (index, (expected_record, actual_record)) in
        expected_records.iter().zip(&actual_records).enumerate()
    {
        let line = index + 1;
        if expected_record.action != actual_record.action {
            return Err(HarnessError::ValueMismatch {
                case_index,
                line,
                field: "action",
                expected: expected_record.action.to_string(),
                actual: actual_record.action.to_string(),
            });
        }
        if expected_record.unit_key != actual_record.unit_key {
            return Err(HarnessError::ValueMismatch {
                case_index,
                line,
                field: "unit key",
                expected: expected_record.unit_key.clone(),
                actual: actual_record.unit_key.clone(),
            });
        }
        let difference = (expected_record.probability - actual_record.probability).abs();
        if difference > probability_epsilon || difference.is_nan() {
            return Err(HarnessError::ValueMismatch {
                case_index,
                line,
                field: "probability",
                expected: expected_record.probability.to_string(),
                actual: actual_record.probability.to_string(),
            });
        }
        if expected_record.context != actual_record.context {
            return Err(HarnessError::ValueMismatch {
                case_index,
                line,
                field: "context",
                expected: expected_record.context.clone(),
                actual: actual_record.context.clone(),
            });
        }
    }

    Ok(())
}

fn parse_records(case_index: usize, raw: &str, side: &str) -> Result<Vec<DecisionRecord>> {
    significant_lines(raw)
        .iter()
        .enumerate()
        .map(|(index, line)| {
            parse_record(line).map_err(|details| HarnessError::ResultParse {
                case_index,
                line: index + 1,
                details: format!("{side} record: {details}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_record() {
        let record = parse_record("10 42 1.0 | FixedAction:20").unwrap();
        assert_eq!(record.action, 10);
        assert_eq!(record.unit_key, "42");
        assert!((record.probability - 1.0).abs() < f64::EPSILON);
        assert_eq!(record.context, "FixedAction:20");
    }

    #[test]
    fn context_may_contain_further_bars() {
        // Only the first bar delimits; the rest belongs to the context group.
        let record = parse_record("3 k 0.5 | a|b|c").unwrap();
        assert_eq!(record.context, "a|b|c");
    }

    #[test]
    fn rejects_missing_separator() {
        let err = parse_record("10 42 1.0").unwrap_err();
        assert!(err.contains("separator"));
    }

    #[test]
    fn rejects_wrong_token_count() {
        let err = parse_record("10 42 | ctx").unwrap_err();
        assert!(err.contains("2 tokens"));

        let err = parse_record("10 42 1.0 extra | ctx").unwrap_err();
        assert!(err.contains("4 tokens"));
    }

    #[test]
    fn rejects_non_numeric_action_and_probability() {
        let err = parse_record("ten 42 1.0 | ctx").unwrap_err();
        assert!(err.contains("action"));

        let err = parse_record("-1 42 1.0 | ctx").unwrap_err();
        assert!(err.contains("action"));

        let err = parse_record("10 42 high | ctx").unwrap_err();
        assert!(err.contains("probability"));
    }

    fn records(lines: &[&str]) -> String {
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    #[test]
    fn identical_records_agree() {
        let raw = records(&["10 1 1.0 | ctx", "10 2 1.0 | ctx"]);
        compare_records(0, &raw, &raw, 1e-4).unwrap();
    }

    #[test]
    fn probability_within_epsilon_agrees() {
        let expected = records(&["81 7 0.01234 | VariableAction:90"]);
        let actual = records(&["81 7 0.01238 | VariableAction:90"]);
        compare_records(0, &expected, &actual, 1e-4).unwrap();
    }

    #[test]
    fn probability_beyond_epsilon_is_mismatch() {
        let expected = records(&["81 7 0.0123 | ctx"]);
        let actual = records(&["81 7 0.0125 | ctx"]);
        let err = compare_records(5, &expected, &actual, 1e-4).unwrap_err();
        let HarnessError::ValueMismatch {
            case_index,
            line,
            field,
            ..
        } = err
        else {
            panic!("expected ValueMismatch");
        };
        assert_eq!(case_index, 5);
        assert_eq!(line, 1);
        assert_eq!(field, "probability");
    }

    #[test]
    fn action_mismatch_is_exact() {
        let err = compare_records(
            0,
            &records(&["10 1 1.0 | ctx"]),
            &records(&["11 1 1.0 | ctx"]),
            1e-4,
        )
        .unwrap_err();
        let HarnessError::ValueMismatch { field, .. } = err else {
            panic!("expected ValueMismatch");
        };
        assert_eq!(field, "action");
    }

    #[test]
    fn key_and_context_mismatches_are_exact() {
        let err = compare_records(
            0,
            &records(&["10 1 1.0 | ctx"]),
            &records(&["10 2 1.0 | ctx"]),
            1e-4,
        )
        .unwrap_err();
        let HarnessError::ValueMismatch { field, .. } = err else {
            panic!("expected ValueMismatch");
        };
        assert_eq!(field, "unit key");

        let err = compare_records(
            0,
            &records(&["10 1 1.0 | FixedAction:20"]),
            &records(&["10 1 1.0 | FixedAction:21"]),
            1e-4,
        )
        .unwrap_err();
        let HarnessError::ValueMismatch { field, .. } = err else {
            panic!("expected ValueMismatch");
        };
        assert_eq!(field, "context");
    }

    #[test]
    fn context_whitespace_is_trimmed_before_comparison() {
        compare_records(
            0,
            &records(&["10 1 1.0 |  ctx  "]),
            &records(&["10 1 1.0 | ctx"]),
            1e-4,
        )
        .unwrap();
    }

    #[test]
    fn malformed_actual_record_names_the_side() {
        let expected = records(&["10 1 1.0 | ctx"]);
        let actual = records(&["10 1 | ctx"]);
        let err = compare_records(2, &expected, &actual, 1e-4).unwrap_err();
        let HarnessError::ResultParse {
            case_index,
            line,
            details,
        } = err
        else {
            panic!("expected ResultParse");
        };
        assert_eq!(case_index, 2);
        assert_eq!(line, 1);
        assert!(details.contains("actual record"));
    }

    #[test]
    fn record_count_mismatch() {
        let expected = records(&["10 1 1.0 | ctx", "10 2 1.0 | ctx"]);
        let actual = records(&["10 1 1.0 | ctx"]);
        let err = compare_records(0, &expected, &actual, 1e-4).unwrap_err();
        assert_eq!(err.code(), "ECH-4003");
    }
}
