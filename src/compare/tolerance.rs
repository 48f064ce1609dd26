//! Tolerance comparison for newline-separated floating outputs.

use crate::compare::significant_lines;
use crate::core::errors::{HarnessError, Result};

/// Require equal-length float sequences with `|expected - actual| <= epsilon`
/// at every index.
///
/// A line that does not parse as a float is a hard result-parse failure, not
/// a silent skip.
pub fn compare_within(case_index: usize, expected: &str, actual: &str, epsilon: f64) -> Result<()> {
    let expected_values = parse_floats(case_index, expected, "expected")?;
    let actual_values = parse_floats(case_index, actual, "actual")?;

    if expected_values.len() != actual_values.len() {
        return Err(HarnessError::LengthMismatch {
            case_index,
            expected: expected_values.len(),
            actual: actual_values.len(),
        });
    }

    for (index, (expected_value, actual_value)) in
        expected_values.iter().zip(&actual_values).enumerate()
    {
        let difference = (expected_value - actual_value).abs();
        // NaN on either side must fail, not pass.
        if difference > epsilon || difference.is_nan() {
            return Err(HarnessError::ValueMismatch {
                case_index,
                line: index + 1,
                field: "value",
                expected: expected_value.to_string(),
                actual: actual_value.to_string(),
            });
        }
    }

    Ok(())
}

fn parse_floats(case_index: usize, raw: &str, side: &str) -> Result<Vec<f64>> {
    significant_lines(raw)
        .iter()
        .enumerate()
        .map(|(index, line)| {
            line.parse::<f64>()
                .map_err(|error| HarnessError::ResultParse {
                    case_index,
                    line: index + 1,
                    details: format!("{side} value {line:?} is not a float: {error}"),
                })
        })
        .collect()
}
