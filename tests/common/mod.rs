//! Shared helpers for integration tests: scripted stand-in implementations
//! and orchestrator wiring.
//!
//! A stand-in implementation is a shell script honouring the harness's file
//! contract: it receives the batch artifact path as its only argument, reads
//! the `OutputFile` destinations out of it, and copies canned per-case
//! results into place. This keeps the full differential loop hermetic — no
//! real exploration library is needed.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use explore_conformance_harness::core::config::{Config, ImplementationConfig, RunnerConfig};
use explore_conformance_harness::runner::orchestrator::DifferentialOrchestrator;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_ech") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "ech.exe" } else { "ech" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve ech binary path for integration test"),
    }
}

/// Run the `ech` binary with the given arguments.
pub fn run_cli(args: &[&str]) -> CmdResult {
    let output = Command::new(resolve_bin_path())
        .args(args)
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute ech command");

    CmdResult {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

#[cfg(unix)]
pub fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod stub script");
}

/// Write a stand-in implementation that answers every case with canned
/// content, in batch order.
#[cfg(unix)]
pub fn write_stub(dir: &Path, name: &str, case_outputs: &[String]) -> PathBuf {
    let data_dir = dir.join(format!("{name}-data"));
    fs::create_dir_all(&data_dir).expect("create stub data dir");
    for (index, content) in case_outputs.iter().enumerate() {
        fs::write(data_dir.join(format!("case_{index}.txt")), content).expect("write stub data");
    }

    let script = dir.join(format!("{name}.sh"));
    let body = format!(
        r#"#!/bin/sh
set -eu
grep -o '"OutputFile": "[^"]*"' "$1" | cut -d'"' -f4 | {{
  i=0
  while IFS= read -r out; do
    cp "{data}/case_$i.txt" "$out"
    i=$((i+1))
  done
}}
"#,
        data = data_dir.display()
    );
    fs::write(&script, body).expect("write stub script");
    make_executable(&script);
    script
}

/// Write a stand-in implementation that runs `body` verbatim (for crash,
/// hang, and silent-exit shapes).
#[cfg(unix)]
pub fn write_raw_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let script = dir.join(format!("{name}.sh"));
    fs::write(&script, format!("#!/bin/sh\n{body}\n")).expect("write stub script");
    make_executable(&script);
    script
}

/// Orchestrator over two stand-in executables with a short timeout.
pub fn orchestrator_over(
    expected: &Path,
    actual: &Path,
    scratch_root: &Path,
) -> DifferentialOrchestrator {
    let config = Config {
        implementations: vec![
            ImplementationConfig {
                name: "expected".to_string(),
                executable: expected.to_path_buf(),
            },
            ImplementationConfig {
                name: "actual".to_string(),
                executable: actual.to_path_buf(),
            },
        ],
        runner: RunnerConfig {
            timeout_secs: 10,
            poll_interval_ms: 5,
        },
        paths: explore_conformance_harness::core::config::PathsConfig {
            scratch_root: scratch_root.to_path_buf(),
            ..Default::default()
        },
    };
    DifferentialOrchestrator::from_config(&config).expect("build orchestrator")
}

/// Experimental-unit ids `1..=count` as decimal strings.
pub fn unit_ids(count: usize) -> Vec<String> {
    (1..=count).map(|i| i.to_string()).collect()
}

/// One decision-record artifact: `<action> <key> <probability> | <context>`
/// per unit.
pub fn decision_records(
    units: &[String],
    action: u32,
    probability: impl Fn(usize) -> f64,
    context: &str,
) -> String {
    let mut out = String::new();
    for (index, unit) in units.iter().enumerate() {
        out.push_str(&format!(
            "{action} {unit} {prob} | {context}\n",
            prob = probability(index)
        ));
    }
    out
}
