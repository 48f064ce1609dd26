//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{HarnessError, Result};

/// Full harness configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    /// Implementations under test, in run order. The first entry is the
    /// baseline whose results every later entry is compared against.
    pub implementations: Vec<ImplementationConfig>,
    pub runner: RunnerConfig,
    pub paths: PathsConfig,
}

/// One implementation under test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImplementationConfig {
    /// Role label, used in output-file addressing (e.g. "expected", "actual").
    pub name: String,
    /// Path to the implementation executable.
    pub executable: PathBuf,
}

/// Process-runner knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Kill an implementation that has not exited after this many seconds.
    pub timeout_secs: u64,
    /// How often to poll a running implementation for exit.
    pub poll_interval_ms: u64,
}

/// Filesystem paths used by the harness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    /// Parent directory under which per-scenario scratch directories live.
    pub scratch_root: PathBuf,
    pub jsonl_log: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            poll_interval_ms: 20,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[ECH-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let cfg = home_dir.join(".config").join("ech").join("config.toml");
        let data = home_dir.join(".local").join("share").join("ech");
        Self {
            config_file: cfg,
            scratch_root: env::temp_dir().join("ech-scratch"),
            jsonl_log: data.join("harness.jsonl"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| HarnessError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(HarnessError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolve the two implementations a differential run needs.
    ///
    /// The baseline design compares exactly two result sets; the config may
    /// stay empty for codec-only commands, so the requirement is enforced here
    /// rather than in [`Config::validate`].
    pub fn require_two_implementations(&self) -> Result<(&ImplementationConfig, &ImplementationConfig)> {
        match self.implementations.as_slice() {
            [first, second] => Ok((first, second)),
            other => Err(HarnessError::InvalidConfig {
                details: format!(
                    "a differential run needs exactly 2 implementations, got {}",
                    other.len()
                ),
            }),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        set_env_u64("ECH_RUNNER_TIMEOUT_SECS", &mut self.runner.timeout_secs)?;
        set_env_u64(
            "ECH_RUNNER_POLL_INTERVAL_MS",
            &mut self.runner.poll_interval_ms,
        )?;
        set_env_path("ECH_SCRATCH_ROOT", &mut self.paths.scratch_root);
        set_env_path("ECH_JSONL_LOG", &mut self.paths.jsonl_log);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.runner.timeout_secs == 0 {
            return Err(HarnessError::InvalidConfig {
                details: "runner.timeout_secs must be >= 1".to_string(),
            });
        }
        if self.runner.poll_interval_ms == 0 {
            return Err(HarnessError::InvalidConfig {
                details: "runner.poll_interval_ms must be >= 1".to_string(),
            });
        }
        if self.runner.poll_interval_ms > self.runner.timeout_secs * 1000 {
            return Err(HarnessError::InvalidConfig {
                details: format!(
                    "runner.poll_interval_ms ({}) must not exceed the timeout ({}s)",
                    self.runner.poll_interval_ms, self.runner.timeout_secs
                ),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for implementation in &self.implementations {
            if implementation.name.trim().is_empty() {
                return Err(HarnessError::InvalidConfig {
                    details: "implementation name must not be empty".to_string(),
                });
            }
            if implementation.executable.as_os_str().is_empty() {
                return Err(HarnessError::InvalidConfig {
                    details: format!(
                        "implementation {:?} has an empty executable path",
                        implementation.name
                    ),
                });
            }
            if !seen.insert(implementation.name.as_str()) {
                return Err(HarnessError::InvalidConfig {
                    details: format!(
                        "implementation names must be distinct; {:?} appears twice",
                        implementation.name
                    ),
                });
            }
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_env_u64(name: &str, slot: &mut u64) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = raw
            .parse::<u64>()
            .map_err(|error| HarnessError::ConfigParse {
                context: "env",
                details: format!("{name}={raw:?}: {error}"),
            })?;
    }
    Ok(())
}

fn set_env_path(name: &str, slot: &mut PathBuf) {
    if let Some(raw) = env_var(name) {
        *slot = PathBuf::from(raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_impls() -> Vec<ImplementationConfig> {
        vec![
            ImplementationConfig {
                name: "expected".to_string(),
                executable: PathBuf::from("/opt/explore-cpp/blackbox"),
            },
            ImplementationConfig {
                name: "actual".to_string(),
                executable: PathBuf::from("/opt/explore-rs/blackbox"),
            },
        ]
    }

    #[test]
    fn defaults_validate() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.runner.timeout_secs, 120);
        assert!(cfg.implementations.is_empty());
    }

    #[test]
    fn require_two_implementations_rejects_other_counts() {
        let mut cfg = Config::default();
        assert!(cfg.require_two_implementations().is_err());

        cfg.implementations = two_impls();
        let (first, second) = cfg.require_two_implementations().unwrap();
        assert_eq!(first.name, "expected");
        assert_eq!(second.name, "actual");

        cfg.implementations.push(ImplementationConfig {
            name: "third".to_string(),
            executable: PathBuf::from("/opt/x"),
        });
        assert!(cfg.require_two_implementations().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut cfg = Config::default();
        cfg.runner.timeout_secs = 0;
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.code(), "ECH-1001");
    }

    #[test]
    fn validate_rejects_poll_longer_than_timeout() {
        let mut cfg = Config::default();
        cfg.runner.timeout_secs = 1;
        cfg.runner.poll_interval_ms = 5_000;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let mut cfg = Config::default();
        cfg.implementations = two_impls();
        cfg.implementations[1].name = "expected".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn validate_rejects_empty_name_and_executable() {
        let mut cfg = Config::default();
        cfg.implementations = two_impls();
        cfg.implementations[0].name = "  ".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.implementations = two_impls();
        cfg.implementations[1].executable = PathBuf::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[[implementations]]
name = "expected"
executable = "/opt/explore-cpp/blackbox"

[[implementations]]
name = "actual"
executable = "/opt/explore-rs/blackbox"

[runner]
timeout_secs = 30
poll_interval_ms = 10

[paths]
scratch_root = "/tmp/ech-test"
"#,
        )
        .unwrap();

        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.implementations.len(), 2);
        assert_eq!(cfg.runner.timeout_secs, 30);
        assert_eq!(cfg.paths.scratch_root, PathBuf::from("/tmp/ech-test"));
        assert_eq!(cfg.paths.config_file, path);
    }

    #[test]
    fn load_rejects_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/ech.toml"))).unwrap_err();
        assert_eq!(err.code(), "ECH-1002");
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "= nonsense").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code(), "ECH-1003");
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.implementations = two_impls();
        let raw = toml::to_string(&cfg).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed, cfg);
    }
}
