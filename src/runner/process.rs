//! Blocking subprocess invocation of one implementation under test.
//!
//! The contract is file-based: the implementation receives exactly one
//! argument, the path of the serialized batch, and writes its results to the
//! paths the batch names. Standard streams are detached; nothing is captured.
//! The wait is bounded: a hanging implementation is killed and surfaced as a
//! distinct timeout failure instead of stalling the harness.

use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::config::RunnerConfig;
use crate::core::errors::{HarnessError, Result};

/// Runs one implementation over one serialized batch and blocks until it
/// exits or exceeds the configured timeout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    poll_interval: Duration,
}

impl ProcessRunner {
    /// Runner with explicit timeout and exit-poll interval.
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Runner configured from the `[runner]` config section.
    #[must_use]
    pub const fn from_config(config: &RunnerConfig) -> Self {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            Duration::from_millis(config.poll_interval_ms),
        )
    }

    /// Run `executable <batch_path>` to completion.
    ///
    /// Distinguishes three process failures: the executable cannot be
    /// launched, it exits non-zero, or it outlives the timeout and is killed.
    pub fn run(&self, executable: &Path, batch_path: &Path) -> Result<()> {
        let mut child = Command::new(executable)
            .arg(batch_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| HarnessError::ProcessSpawn {
                executable: executable.to_path_buf(),
                details: error.to_string(),
            })?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if status.success() {
                        return Ok(());
                    }
                    return Err(HarnessError::ProcessExit {
                        executable: executable.to_path_buf(),
                        code: status.code(),
                    });
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(HarnessError::ProcessTimeout {
                            executable: executable.to_path_buf(),
                            timeout_secs: self.timeout.as_secs(),
                        });
                    }
                    thread::sleep(self.poll_interval);
                }
                Err(error) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HarnessError::ProcessSpawn {
                        executable: executable.to_path_buf(),
                        details: format!("wait failed: {error}"),
                    });
                }
            }
        }
    }
}
