//! Scenario-level verdicts: the serializable outcome of one differential run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::HarnessError;
use crate::model::case::CaseCategory;

/// Outcome of comparing one case's result artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseVerdict {
    /// Position of the case in the batch.
    pub case_index: usize,
    /// Result category the comparison mode was selected by.
    pub category: CaseCategory,
    /// Whether both implementations agreed.
    pub agreed: bool,
    /// Error code of the failure, when `agreed` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Localized failure description, when `agreed` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CaseVerdict {
    /// Verdict for an agreeing case.
    #[must_use]
    pub const fn agreed(case_index: usize, category: CaseCategory) -> Self {
        Self {
            case_index,
            category,
            agreed: true,
            error_code: None,
            detail: None,
        }
    }

    /// Verdict for a failed case, capturing the failure's code and context.
    #[must_use]
    pub fn failed(case_index: usize, category: CaseCategory, error: &HarnessError) -> Self {
        Self {
            case_index,
            category,
            agreed: false,
            error_code: Some(error.code().to_string()),
            detail: Some(error.to_string()),
        }
    }
}

/// Aggregated result of one scenario: one verdict per case, in batch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub scenario: String,
    /// Per-case verdicts.
    pub verdicts: Vec<CaseVerdict>,
}

impl ScenarioReport {
    /// Whether every case agreed. No partial credit: one failed case fails
    /// the scenario.
    #[must_use]
    pub fn agreed(&self) -> bool {
        self.verdicts.iter().all(|verdict| verdict.agreed)
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.agreed).count()
    }

    /// First failed verdict, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&CaseVerdict> {
        self.verdicts.iter().find(|v| !v.agreed)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.agreed() {
            write!(
                f,
                "{}: AGREED ({} cases)",
                self.scenario,
                self.verdicts.len()
            )
        } else {
            write!(
                f,
                "{}: FAILED ({}/{} cases)",
                self.scenario,
                self.failed_count(),
                self.verdicts.len()
            )?;
            if let Some(failure) = self.first_failure() {
                write!(
                    f,
                    "; first: {}",
                    failure.detail.as_deref().unwrap_or("unknown")
                )?;
            }
            Ok(())
        }
    }
}
