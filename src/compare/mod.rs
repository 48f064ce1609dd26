//! Output comparator: per-category comparison modes and tolerance policy.
//!
//! The mode is a pure function of the case shape. Two tolerance constants
//! exist on purpose: raw unit-interval draws are a single untransformed value
//! and get the tight bound, while derived probabilities accumulate float error
//! across implementations and get the wide one. They are never merged.

pub mod exact;
pub mod record;
pub mod report;
pub mod tolerance;

use std::fs;
use std::path::Path;

use crate::core::errors::{HarnessError, Result};
use crate::model::case::CaseCategory;

/// Tolerance for raw unit-interval PRG draws.
pub const UNIT_DRAW_EPSILON: f64 = 1e-6;

/// Tolerance for derived floating outputs such as selection probabilities.
pub const PROBABILITY_EPSILON: f64 = 1e-4;

/// How two result artifacts for one case are compared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComparisonMode {
    /// Ordered, trimmed, blank-stripped lines must match exactly.
    Exact,
    /// Newline-separated floats must match within `epsilon` per index.
    Tolerance { epsilon: f64 },
    /// Positional decision records; probability within `probability_epsilon`.
    Records { probability_epsilon: f64 },
}

/// Comparison mode selected by a case's result category.
#[must_use]
pub const fn mode_for(category: CaseCategory) -> ComparisonMode {
    match category {
        CaseCategory::IntegerDraw | CaseCategory::HashDigest => ComparisonMode::Exact,
        CaseCategory::UnitDraw => ComparisonMode::Tolerance {
            epsilon: UNIT_DRAW_EPSILON,
        },
        CaseCategory::DecisionRecords => ComparisonMode::Records {
            probability_epsilon: PROBABILITY_EPSILON,
        },
    }
}

/// Read both result artifacts for one case and compare them under `mode`.
///
/// A missing or unreadable artifact surfaces as an IO failure naming the
/// path; this is how a silently crashed implementation is observed.
pub fn compare_result_files(
    case_index: usize,
    mode: ComparisonMode,
    expected_path: &Path,
    actual_path: &Path,
) -> Result<()> {
    let expected =
        fs::read_to_string(expected_path).map_err(|source| HarnessError::io(expected_path, source))?;
    let actual =
        fs::read_to_string(actual_path).map_err(|source| HarnessError::io(actual_path, source))?;

    match mode {
        ComparisonMode::Exact => exact::compare_exact(case_index, &expected, &actual),
        ComparisonMode::Tolerance { epsilon } => {
            tolerance::compare_within(case_index, &expected, &actual, epsilon)
        }
        ComparisonMode::Records {
            probability_epsilon,
        } => record::compare_records(case_index, &expected, &actual, probability_epsilon),
    }
}

/// Trimmed, non-blank lines of a result artifact, in order.
pub(crate) fn significant_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
