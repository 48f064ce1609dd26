//! Batch interchange codec and per-run output addressing.
//!
//! A batch is serialized as one JSON array; each element is a case object
//! carrying its `Type` discriminator plus an `OutputFile` destination. The
//! fixture cases themselves stay immutable: the destination is computed at
//! encode time from an [`OutputPlan`], so re-encoding the same batch for a
//! different implementation changes nothing but the output paths.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{HarnessError, Result};
use crate::model::case::TestCase;

/// A case paired with the output destination assigned for one run.
///
/// This is the wire shape consumed by the implementations under test; the
/// discriminated case fields are inlined next to `OutputFile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressedCase {
    /// Result file this case must write to. Set by the harness, never by the
    /// fixture author.
    #[serde(rename = "OutputFile")]
    pub output_file: PathBuf,
    #[serde(flatten)]
    pub case: TestCase,
}

/// Pure addressing function for one (scenario, implementation role) pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    scratch_dir: PathBuf,
    scenario: String,
    role: String,
}

impl OutputPlan {
    /// Addressing for `role`'s pass over `scenario`, rooted at `scratch_dir`.
    #[must_use]
    pub fn new(scratch_dir: impl Into<PathBuf>, scenario: &str, role: &str) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            scenario: scenario.to_string(),
            role: role.to_string(),
        }
    }

    /// Result path for the case at `case_index`.
    ///
    /// Deterministic in (scratch, scenario, index, role); positional
    /// correspondence between implementations falls out of the shared index.
    #[must_use]
    pub fn output_path(&self, case_index: usize) -> PathBuf {
        self.scratch_dir.join(format!(
            "{}_result_{}_{}.txt",
            self.scenario, case_index, self.role
        ))
    }

    /// Role label this plan addresses for.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }
}

/// Path of the serialized batch artifact for a scenario.
///
/// Both implementation passes read the same artifact path; only its contents
/// (the `OutputFile` fields) differ between passes.
#[must_use]
pub fn batch_artifact_path(scratch_dir: &Path, scenario: &str) -> PathBuf {
    scratch_dir.join(format!("{scenario}.json"))
}

/// Pair every case with its planned output destination, in batch order.
#[must_use]
pub fn address_batch(cases: &[TestCase], plan: &OutputPlan) -> Vec<AddressedCase> {
    cases
        .iter()
        .enumerate()
        .map(|(index, case)| AddressedCase {
            output_file: plan.output_path(index),
            case: case.clone(),
        })
        .collect()
}

/// Encode a batch for one implementation pass.
///
/// Pretty-printed so the artifact doubles as a human-inspectable record of
/// exactly what each implementation was fed.
pub fn encode_batch(cases: &[TestCase], plan: &OutputPlan) -> Result<String> {
    let addressed = address_batch(cases, plan);
    Ok(serde_json::to_string_pretty(&addressed)?)
}

/// Encode a batch and write the artifact to `path`.
pub fn write_batch(cases: &[TestCase], plan: &OutputPlan, path: &Path) -> Result<()> {
    let encoded = encode_batch(cases, plan)?;
    fs::write(path, encoded).map_err(|source| HarnessError::io(path, source))
}

/// Decode a batch artifact.
///
/// Any missing or unrecognized discriminator, or a missing required field,
/// means the writer and reader have drifted out of sync on the interchange
/// contract and is reported as a schema violation naming `context`.
pub fn decode_batch(raw: &str, context: &str) -> Result<Vec<AddressedCase>> {
    serde_json::from_str(raw).map_err(|error| HarnessError::SchemaViolation {
        context: context.to_string(),
        details: error.to_string(),
    })
}

/// Read and decode a batch artifact from disk.
pub fn read_batch(path: &Path) -> Result<Vec<AddressedCase>> {
    let raw = fs::read_to_string(path).map_err(|source| HarnessError::io(path, source))?;
    decode_batch(&raw, &path.display().to_string())
}
