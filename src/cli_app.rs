//! Top-level CLI definition and dispatch.
//!
//! Thin by design: scenario fixtures come from a suite file, orchestration
//! lives in the library. The CLI only wires config, logging, and output
//! formatting together.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use explore_conformance_harness::core::config::Config;
use explore_conformance_harness::core::errors::{HarnessError, Result};
use explore_conformance_harness::logger::jsonl::JsonlWriter;
use explore_conformance_harness::model::codec::{OutputPlan, encode_batch};
use explore_conformance_harness::runner::orchestrator::{DifferentialOrchestrator, Scenario};

/// Exploration Conformance Harness — differential black-box testing for
/// exploration libraries.
#[derive(Debug, Parser)]
#[command(
    name = "ech",
    author,
    version,
    about = "Exploration Conformance Harness - differential black-box testing",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run a scenario suite against the configured implementations.
    Run(RunArgs),
    /// Encode a suite's batches to stdout for inspection.
    Encode(EncodeArgs),
    /// Load and validate the configuration, then print it.
    CheckConfig,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Suite file: a JSON array of scenarios.
    #[arg(value_name = "SUITE")]
    suite: PathBuf,
    /// Run only the named scenario.
    #[arg(long, value_name = "NAME")]
    scenario: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct EncodeArgs {
    /// Suite file: a JSON array of scenarios.
    #[arg(value_name = "SUITE")]
    suite: PathBuf,
    /// Implementation role to address output files for.
    #[arg(long, default_value = "expected", value_name = "ROLE")]
    role: String,
}

/// Dispatch a parsed CLI invocation.
///
/// A suite whose scenarios disagree exits non-zero without being a harness
/// error; harness errors are reported by the caller.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Run(args) => run_suite(cli, &config, args),
        Command::Encode(args) => encode_suite(&config, args).map(|()| ExitCode::SUCCESS),
        Command::CheckConfig => check_config(cli, &config).map(|()| ExitCode::SUCCESS),
    }
}

fn run_suite(cli: &Cli, config: &Config, args: &RunArgs) -> Result<ExitCode> {
    let scenarios = load_suite(&args.suite, args.scenario.as_deref())?;

    let logger = JsonlWriter::open(&config.paths.jsonl_log);
    let mut orchestrator = DifferentialOrchestrator::from_config(config)?.with_logger(logger);

    let reports = orchestrator.run_suite(&scenarios)?;
    let failed = reports.iter().filter(|report| !report.agreed()).count();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            let line = report.to_string();
            if report.agreed() {
                println!("{}", line.green());
            } else {
                println!("{}", line.red());
            }
        }
        let summary = format!("{} scenarios, {} failed", reports.len(), failed);
        println!("{}", if failed == 0 { summary.green() } else { summary.red() });
    }

    if failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn encode_suite(config: &Config, args: &EncodeArgs) -> Result<()> {
    let scenarios = load_suite(&args.suite, None)?;
    for scenario in &scenarios {
        let scratch = config.paths.scratch_root.join(&scenario.name);
        let plan = OutputPlan::new(&scratch, &scenario.name, &args.role);
        println!("{}", encode_batch(&scenario.cases, &plan)?);
    }
    Ok(())
}

fn check_config(cli: &Cli, config: &Config) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("config: {}", config.paths.config_file.display());
        println!("scratch root: {}", config.paths.scratch_root.display());
        println!("timeout: {}s", config.runner.timeout_secs);
        for implementation in &config.implementations {
            println!(
                "implementation {}: {}",
                implementation.name,
                implementation.executable.display()
            );
        }
    }
    Ok(())
}

fn load_suite(path: &Path, only: Option<&str>) -> Result<Vec<Scenario>> {
    let raw = fs::read_to_string(path).map_err(|source| HarnessError::io(path, source))?;
    let scenarios: Vec<Scenario> =
        serde_json::from_str(&raw).map_err(|error| HarnessError::SchemaViolation {
            context: path.display().to_string(),
            details: error.to_string(),
        })?;

    match only {
        None => Ok(scenarios),
        Some(name) => {
            let filtered: Vec<Scenario> = scenarios
                .into_iter()
                .filter(|scenario| scenario.name == name)
                .collect();
            if filtered.is_empty() {
                return Err(HarnessError::InvalidConfig {
                    details: format!("suite has no scenario named {name:?}"),
                });
            }
            Ok(filtered)
        }
    }
}
