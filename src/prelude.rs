//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use explore_conformance_harness::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, ImplementationConfig};
pub use crate::core::errors::{HarnessError, Result};

// Model
pub use crate::model::case::{
    CaseCategory, ContextType, EpsilonGreedyCase, ExploreBase, GenericCase, HashCase,
    PolicyConfig, PrgCase, ScorerConfig, SoftmaxCase, TauFirstCase, TestCase,
};
pub use crate::model::codec::{AddressedCase, OutputPlan};

// Runner
pub use crate::runner::orchestrator::{DifferentialOrchestrator, Scenario};
pub use crate::runner::process::ProcessRunner;
pub use crate::runner::workdir::ScratchDir;

// Compare
pub use crate::compare::report::{CaseVerdict, ScenarioReport};
pub use crate::compare::{ComparisonMode, PROBABILITY_EPSILON, UNIT_DRAW_EPSILON};
