//! ECH-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Top-level error type for the conformance harness.
///
/// Comparison failures carry the case index and, where applicable, the line
/// number and field name, so a disagreement can be localized without re-running
/// the scenario.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("[ECH-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[ECH-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[ECH-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[ECH-1101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[ECH-2001] interchange schema violation in {context}: {details}")]
    SchemaViolation { context: String, details: String },

    #[error("[ECH-3001] failed to launch {executable}: {details}")]
    ProcessSpawn {
        executable: PathBuf,
        details: String,
    },

    #[error("[ECH-3002] {executable} exited with status {}", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    ProcessExit {
        executable: PathBuf,
        code: Option<i32>,
    },

    #[error("[ECH-3003] {executable} exceeded the {timeout_secs}s timeout and was killed")]
    ProcessTimeout {
        executable: PathBuf,
        timeout_secs: u64,
    },

    #[error("[ECH-3101] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[ECH-4001] case {case_index} result line {line}: {details}")]
    ResultParse {
        case_index: usize,
        line: usize,
        details: String,
    },

    #[error(
        "[ECH-4002] case {case_index} line {line} field {field}: expected {expected}, got {actual}"
    )]
    ValueMismatch {
        case_index: usize,
        line: usize,
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("[ECH-4003] case {case_index}: {expected} records vs {actual} records")]
    LengthMismatch {
        case_index: usize,
        expected: usize,
        actual: usize,
    },
}

impl HarnessError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "ECH-1001",
            Self::MissingConfig { .. } => "ECH-1002",
            Self::ConfigParse { .. } => "ECH-1003",
            Self::Serialization { .. } => "ECH-1101",
            Self::SchemaViolation { .. } => "ECH-2001",
            Self::ProcessSpawn { .. } => "ECH-3001",
            Self::ProcessExit { .. } => "ECH-3002",
            Self::ProcessTimeout { .. } => "ECH-3003",
            Self::Io { .. } => "ECH-3101",
            Self::ResultParse { .. } => "ECH-4001",
            Self::ValueMismatch { .. } => "ECH-4002",
            Self::LengthMismatch { .. } => "ECH-4003",
        }
    }

    /// Whether this failure means the two implementations produced different
    /// results, as opposed to the harness itself failing to run or parse.
    #[must_use]
    pub const fn is_disagreement(&self) -> bool {
        matches!(
            self,
            Self::ValueMismatch { .. } | Self::LengthMismatch { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for HarnessError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
