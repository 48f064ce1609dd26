#![forbid(unsafe_code)]

//! ech — Exploration Conformance Harness CLI entry point.

use std::process::ExitCode;

use clap::Parser;

mod cli_app;

fn main() -> ExitCode {
    let args = cli_app::Cli::parse();
    match cli_app::run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ech: {e}");
            ExitCode::FAILURE
        }
    }
}
