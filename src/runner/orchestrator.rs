//! Differential orchestrator: drives every implementation over the same
//! logical batch, then compares the result sets pairwise.
//!
//! Both implementations receive batches identical in every field except the
//! per-case `OutputFile`. Passes are strictly sequential, so no two
//! implementations ever write into the shared scratch area concurrently, and
//! result `i` of the baseline corresponds to result `i` of the candidate by
//! construction.

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::compare::report::{CaseVerdict, ScenarioReport};
use crate::compare::{compare_result_files, mode_for};
use crate::core::config::{Config, ImplementationConfig};
use crate::core::errors::{HarnessError, Result};
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};
use crate::model::case::TestCase;
use crate::model::codec::{OutputPlan, batch_artifact_path, write_batch};
use crate::runner::process::ProcessRunner;
use crate::runner::workdir::ScratchDir;

/// One named scenario: an ordered batch of immutable fixture cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Scenario {
    /// Scenario name; becomes the scratch-file prefix.
    pub name: String,
    /// Batch of cases, in run order.
    pub cases: Vec<TestCase>,
}

/// Drives a differential run: encode, run each implementation, compare.
pub struct DifferentialOrchestrator {
    implementations: Vec<ImplementationConfig>,
    runner: ProcessRunner,
    scratch_root: PathBuf,
    logger: Option<JsonlWriter>,
}

impl DifferentialOrchestrator {
    /// Build from the harness config. Requires exactly two implementations.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (first, second) = config.require_two_implementations()?;
        Ok(Self {
            implementations: vec![first.clone(), second.clone()],
            runner: ProcessRunner::from_config(&config.runner),
            scratch_root: config.paths.scratch_root.clone(),
            logger: None,
        })
    }

    /// Attach a JSONL run logger.
    #[must_use]
    pub fn with_logger(mut self, logger: JsonlWriter) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Run every scenario in order, stopping only on harness-level failures.
    ///
    /// A scenario whose implementations disagree still produces a report;
    /// a scenario whose implementations cannot be run at all aborts the suite.
    pub fn run_suite(&mut self, scenarios: &[Scenario]) -> Result<Vec<ScenarioReport>> {
        scenarios
            .iter()
            .map(|scenario| self.run_scenario(scenario))
            .collect()
    }

    /// Run one scenario to completion: both implementation passes plus
    /// comparison.
    ///
    /// Process-level failures (spawn, non-zero exit, timeout) abort with an
    /// error. Comparison-level failures, including a missing result file from
    /// a silently crashed implementation, become failed verdicts in the
    /// report. Scratch teardown is guaranteed on every path.
    pub fn run_scenario(&mut self, scenario: &Scenario) -> Result<ScenarioReport> {
        validate_scenario_name(&scenario.name)?;

        self.log(LogEntry::new(EventType::ScenarioStart, Severity::Info).scenario(&scenario.name));

        let scratch = ScratchDir::create(self.scratch_root.join(&scenario.name))?;
        let artifact = batch_artifact_path(scratch.path(), &scenario.name);

        let implementations = self.implementations.clone();
        for implementation in &implementations {
            let plan = OutputPlan::new(scratch.path(), &scenario.name, &implementation.name);
            write_batch(&scenario.cases, &plan, &artifact)?;
            self.log(
                LogEntry::new(EventType::BatchEncoded, Severity::Info)
                    .scenario(&scenario.name)
                    .implementation(&implementation.name),
            );

            self.log(
                LogEntry::new(EventType::ImplementationStart, Severity::Info)
                    .scenario(&scenario.name)
                    .implementation(&implementation.name),
            );
            let started = Instant::now();
            let run_result = self.runner.run(&implementation.executable, &artifact);
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            match run_result {
                Ok(()) => {
                    let mut entry = LogEntry::new(EventType::ImplementationExit, Severity::Info)
                        .scenario(&scenario.name)
                        .implementation(&implementation.name);
                    entry.duration_ms = Some(duration_ms);
                    entry.ok = Some(true);
                    self.log(entry);
                }
                Err(error) => {
                    let mut entry = LogEntry::new(EventType::Error, Severity::Critical)
                        .scenario(&scenario.name)
                        .implementation(&implementation.name);
                    entry.duration_ms = Some(duration_ms);
                    entry.ok = Some(false);
                    entry.error_code = Some(error.code().to_string());
                    entry.error_message = Some(error.to_string());
                    self.log(entry);
                    return Err(error);
                }
            }
        }

        let report = self.compare_results(scenario, &scratch);

        let mut entry = LogEntry::new(EventType::ScenarioComplete, Severity::Info)
            .scenario(&scenario.name);
        entry.ok = Some(report.agreed());
        self.log(entry);

        Ok(report)
    }

    fn compare_results(&mut self, scenario: &Scenario, scratch: &ScratchDir) -> ScenarioReport {
        let baseline = &self.implementations[0];
        let candidate = &self.implementations[1];
        let baseline_plan = OutputPlan::new(scratch.path(), &scenario.name, &baseline.name);
        let candidate_plan = OutputPlan::new(scratch.path(), &scenario.name, &candidate.name);

        let verdicts: Vec<CaseVerdict> = scenario
            .cases
            .iter()
            .enumerate()
            .map(|(index, case)| {
                let category = case.category();
                let outcome = compare_result_files(
                    index,
                    mode_for(category),
                    &baseline_plan.output_path(index),
                    &candidate_plan.output_path(index),
                );
                match outcome {
                    Ok(()) => CaseVerdict::agreed(index, category),
                    Err(error) => CaseVerdict::failed(index, category, &error),
                }
            })
            .collect();

        for verdict in &verdicts {
            let event = if verdict.agreed {
                EventType::CaseAgreed
            } else {
                EventType::CaseDisagreed
            };
            let severity = if verdict.agreed {
                Severity::Info
            } else {
                Severity::Warning
            };
            let mut entry = LogEntry::new(event, severity).scenario(&scenario.name);
            entry.case_index = Some(verdict.case_index);
            entry.category = Some(verdict.category.to_string());
            entry.ok = Some(verdict.agreed);
            entry.error_code = verdict.error_code.clone();
            entry.error_message = verdict.detail.clone();
            self.log(entry);
        }

        ScenarioReport {
            scenario: scenario.name.clone(),
            verdicts,
        }
    }

    fn log(&mut self, entry: LogEntry) {
        if let Some(logger) = self.logger.as_mut() {
            logger.write_entry(&entry);
        }
    }
}

fn validate_scenario_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(HarnessError::InvalidConfig {
            details: "scenario name must not be empty".to_string(),
        });
    }
    if name.contains(['/', '\\']) {
        return Err(HarnessError::InvalidConfig {
            details: format!("scenario name {name:?} must not contain path separators"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RunnerConfig;
    use crate::model::case::{HashCase, PrgCase};

    fn two_impls() -> Vec<ImplementationConfig> {
        vec![
            ImplementationConfig {
                name: "expected".to_string(),
                executable: PathBuf::from("/nonexistent/a"),
            },
            ImplementationConfig {
                name: "actual".to_string(),
                executable: PathBuf::from("/nonexistent/b"),
            },
        ]
    }

    fn orchestrator(scratch_root: &std::path::Path) -> DifferentialOrchestrator {
        DifferentialOrchestrator {
            implementations: two_impls(),
            runner: ProcessRunner::from_config(&RunnerConfig::default()),
            scratch_root: scratch_root.to_path_buf(),
            logger: None,
        }
    }

    #[test]
    fn from_config_requires_two_implementations() {
        let config = Config::default();
        assert!(DifferentialOrchestrator::from_config(&config).is_err());

        let config = Config {
            implementations: two_impls(),
            ..Config::default()
        };
        assert!(DifferentialOrchestrator::from_config(&config).is_ok());
    }

    #[test]
    fn scenario_names_are_validated() {
        assert!(validate_scenario_name("TestPrg").is_ok());
        assert!(validate_scenario_name("").is_err());
        assert!(validate_scenario_name("   ").is_err());
        assert!(validate_scenario_name("a/b").is_err());
        assert!(validate_scenario_name("a\\b").is_err());
    }

    #[test]
    fn missing_executable_aborts_scenario_and_tears_down_scratch() {
        let root = tempfile::tempdir().unwrap();
        let mut orchestrator = orchestrator(root.path());

        let scenario = Scenario {
            name: "TestMissing".to_string(),
            cases: vec![TestCase::Hash(HashCase {
                values: vec!["abc".to_string()],
            })],
        };

        let err = orchestrator.run_scenario(&scenario).unwrap_err();
        assert_eq!(err.code(), "ECH-3001");
        assert!(
            !root.path().join("TestMissing").exists(),
            "scratch must not leak after a failed scenario"
        );
    }

    #[test]
    fn scenario_serde_shape() {
        let scenario = Scenario {
            name: "TestPrg".to_string(),
            cases: vec![TestCase::Prg(PrgCase {
                seed: 0,
                iterations: 3,
                uniform_interval: Some((0, 10)),
            })],
        };
        let json: serde_json::Value = serde_json::to_value(&scenario).unwrap();
        assert_eq!(json["Name"], "TestPrg");
        assert_eq!(json["Cases"][0]["Type"], "Prg");

        let back: Scenario = serde_json::from_value(json).unwrap();
        assert_eq!(back, scenario);
    }
}
