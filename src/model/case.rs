//! Closed test-case model: one tagged union per configuration family.
//!
//! The wire shape is the contract between the harness and the independently
//! built implementations under test: every variant, including the nested
//! policy/scorer configurations, carries an explicit discriminator field, so a
//! reader in any language can reconstruct the exact case without sharing code
//! with the writer. Field names follow the established interchange artifact
//! (PascalCase, `ExperimentalUnitIdList`, `PolicyConfiguration`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// One test case, discriminated by the `Type` field on the wire.
///
/// Every consumption site matches exhaustively; adding a variant is a
/// compile-checked change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum TestCase {
    /// Pseudo-random generator draws from a seed.
    Prg(PrgCase),
    /// Hash digests over an ordered value list.
    Hash(HashCase),
    /// Epsilon-greedy exploration over a default policy.
    EpsilonGreedy(EpsilonGreedyCase),
    /// Tau-first exploration over a default policy.
    TauFirst(TauFirstCase),
    /// Softmax exploration over a scorer.
    Softmax(SoftmaxCase),
    /// Generic (scorer-proportional) exploration.
    Generic(GenericCase),
}

/// PRG draw case.
///
/// `uniform_interval` present means integer draws from `[low, high)`; absent
/// means raw unit-interval draws. Absence is semantically load-bearing and
/// must survive the round trip, so the field is skipped (not nulled) when
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrgCase {
    /// Generator seed.
    pub seed: u64,
    /// Number of draws to produce.
    pub iterations: i32,
    /// Integer draw interval `[low, high)`, or `None` for unit-interval draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniform_interval: Option<(u32, u32)>,
}

/// Hash case. Value order determines output line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HashCase {
    /// Values to hash, one digest line each, in this order.
    pub values: Vec<String>,
}

/// Fields shared by every exploration case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExploreBase {
    /// Application id the implementation seeds its explorer with.
    pub app_id: String,
    /// Context shape the implementation must construct.
    pub context_type: ContextType,
    /// Number of actions to explore over.
    pub number_of_actions: u32,
    /// Experimental-unit ids to run exploration over, one decision each.
    #[serde(rename = "ExperimentalUnitIdList")]
    pub experimental_unit_ids: Vec<String>,
}

/// Epsilon-greedy exploration case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EpsilonGreedyCase {
    /// Shared exploration fields.
    #[serde(flatten)]
    pub base: ExploreBase,
    /// Exploration rate in `[0, 1]`; `0` means never explore.
    pub epsilon: f32,
    /// Default policy explored around.
    #[serde(rename = "PolicyConfiguration")]
    pub policy: PolicyConfig,
}

/// Tau-first exploration case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TauFirstCase {
    /// Shared exploration fields.
    #[serde(flatten)]
    pub base: ExploreBase,
    /// Number of initial decisions that explore uniformly.
    pub tau: u32,
    /// Default policy used once exploration ends.
    #[serde(rename = "PolicyConfiguration")]
    pub policy: PolicyConfig,
}

/// Softmax exploration case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SoftmaxCase {
    /// Shared exploration fields.
    #[serde(flatten)]
    pub base: ExploreBase,
    /// Inverse-temperature of the softmax distribution.
    pub lambda: f32,
    /// Scorer the distribution is derived from.
    #[serde(rename = "ScorerConfiguration")]
    pub scorer: ScorerConfig,
}

/// Generic exploration case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenericCase {
    /// Shared exploration fields.
    #[serde(flatten)]
    pub base: ExploreBase,
    /// Scorer the selection probabilities are proportional to.
    #[serde(rename = "ScorerConfiguration")]
    pub scorer: ScorerConfig,
}

/// Whether the action count is fixed across experimental units or varies per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextType {
    /// Same number of actions for every unit.
    FixedAction,
    /// Action count varies per unit.
    VariableAction,
}

/// Default policy used inside an exploration algorithm, discriminated by
/// `PolicyType` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "PolicyType")]
pub enum PolicyConfig {
    /// Deterministic baseline: always returns `action`.
    Fixed {
        #[serde(rename = "Action")]
        action: u32,
    },
}

/// Scorer used inside scorer-based exploration algorithms, discriminated by
/// `ScorerType` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ScorerType")]
pub enum ScorerConfig {
    /// Every action scores the same constant.
    Fixed {
        #[serde(rename = "Score")]
        score: i32,
    },
    /// Scores run `start .. start + number_of_actions - 1`.
    IntegerProgression {
        #[serde(rename = "Start")]
        start: i32,
    },
}

/// Result-artifact category of a case, which selects the comparison mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseCategory {
    /// Integer draws, one per line; exact text match.
    IntegerDraw,
    /// Raw unit-interval draws, one float per line; tight tolerance.
    UnitDraw,
    /// Hash digests, one per input value; exact text match.
    HashDigest,
    /// Decision records, one per experimental unit.
    DecisionRecords,
}

impl fmt::Display for CaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegerDraw => write!(f, "integer-draw"),
            Self::UnitDraw => write!(f, "unit-draw"),
            Self::HashDigest => write!(f, "hash-digest"),
            Self::DecisionRecords => write!(f, "decision-records"),
        }
    }
}

impl TestCase {
    /// Result category, a pure function of the case shape.
    #[must_use]
    pub const fn category(&self) -> CaseCategory {
        match self {
            Self::Prg(prg) => {
                if prg.uniform_interval.is_some() {
                    CaseCategory::IntegerDraw
                } else {
                    CaseCategory::UnitDraw
                }
            }
            Self::Hash(_) => CaseCategory::HashDigest,
            Self::EpsilonGreedy(_) | Self::TauFirst(_) | Self::Softmax(_) | Self::Generic(_) => {
                CaseCategory::DecisionRecords
            }
        }
    }

    /// Shared exploration fields, for the explore family.
    #[must_use]
    pub const fn explore_base(&self) -> Option<&ExploreBase> {
        match self {
            Self::EpsilonGreedy(c) => Some(&c.base),
            Self::TauFirst(c) => Some(&c.base),
            Self::Softmax(c) => Some(&c.base),
            Self::Generic(c) => Some(&c.base),
            Self::Prg(_) | Self::Hash(_) => None,
        }
    }

    /// Number of result lines the case is expected to produce, where the case
    /// shape determines it.
    #[must_use]
    pub fn expected_line_count(&self) -> usize {
        match self {
            Self::Prg(prg) => usize::try_from(prg.iterations).unwrap_or(0),
            Self::Hash(hash) => hash.values.len(),
            explore => explore
                .explore_base()
                .map_or(0, |base| base.experimental_unit_ids.len()),
        }
    }
}
