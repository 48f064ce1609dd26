//! Exact line-sequence comparison for order-deterministic integer outputs.

use crate::compare::significant_lines;
use crate::core::errors::{HarnessError, Result};

/// Require the trimmed, blank-stripped line sequences to be identical.
///
/// Used for integer-interval PRG draws and hash digests, where both
/// implementations must agree on the exact text of every line.
pub fn compare_exact(case_index: usize, expected: &str, actual: &str) -> Result<()> {
    let expected_lines = significant_lines(expected);
    let actual_lines = significant_lines(actual);

    if expected_lines.len() != actual_lines.len() {
        return Err(HarnessError::LengthMismatch {
            case_index,
            expected: expected_lines.len(),
            actual: actual_lines.len(),
        });
    }

    for (index, (expected_line, actual_line)) in
        expected_lines.iter().zip(&actual_lines).enumerate()
    {
        if expected_line != actual_line {
            return Err(HarnessError::ValueMismatch {
                case_index,
                line: index + 1,
                field: "line",
                expected: (*expected_line).to_string(),
                actual: (*actual_line).to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_agree() {
        compare_exact(0, "10\n20\n30\n", "10\n20\n30\n").unwrap();
    }

    #[test]
    fn whitespace_and_blank_lines_are_insignificant() {
        compare_exact(0, "  10\n\n20  \n", "10\n20\n\n\n").unwrap();
    }

    #[test]
    fn first_divergent_line_is_reported() {
        let err = compare_exact(4, "10\n20\n30\n", "10\n21\n30\n").unwrap_err();
        let HarnessError::ValueMismatch {
            case_index,
            line,
            expected,
            actual,
            ..
        } = err
        else {
            panic!("expected ValueMismatch");
        };
        assert_eq!(case_index, 4);
        assert_eq!(line, 2);
        assert_eq!(expected, "20");
        assert_eq!(actual, "21");
    }

    #[test]
    fn short_output_is_length_mismatch() {
        let err = compare_exact(1, "10\n20\n", "10\n").unwrap_err();
        let HarnessError::LengthMismatch {
            case_index,
            expected,
            actual,
        } = err
        else {
            panic!("expected LengthMismatch");
        };
        assert_eq!(case_index, 1);
        assert_eq!(expected, 2);
        assert_eq!(actual, 1);
    }

    #[test]
    fn empty_artifacts_agree() {
        compare_exact(0, "", "\n\n").unwrap();
    }
}
