#![forbid(unsafe_code)]

//! Exploration Conformance Harness (ech) — differential black-box testing for
//! independently built exploration libraries.
//!
//! The harness verifies that two implementations of a stochastic decision
//! engine (PRG draws, value hashing, exploration policies) agree on outcomes
//! when fed byte-identical input descriptions:
//! 1. **Model + codec** — closed tagged-union test cases serialized to a JSON
//!    interchange artifact any conformant reader can reconstruct
//! 2. **Runner** — sequential, timeout-bounded subprocess passes over the
//!    same logical batch, differing only in output destinations
//! 3. **Comparator** — exact, tolerance, and decision-record comparison modes
//!    selected per case category
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use explore_conformance_harness::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use explore_conformance_harness::model::case::TestCase;
//! use explore_conformance_harness::runner::orchestrator::DifferentialOrchestrator;
//! ```

pub mod prelude;

pub mod compare;
pub mod core;
pub mod logger;
pub mod model;
pub mod runner;
