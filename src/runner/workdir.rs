//! Scoped scratch directory for one scenario.
//!
//! The scratch directory is the only shared resource between implementation
//! passes. It is wiped and recreated on acquisition and removed again on drop,
//! so no scenario can observe artifacts left by another and failed scenarios
//! never leak scratch state.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{HarnessError, Result};

/// RAII guard over a scenario's scratch directory.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Wipe any previous contents at `path` and create it fresh.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            fs::remove_dir_all(&path).map_err(|source| HarnessError::io(&path, source))?;
        }
        fs::create_dir_all(&path).map_err(|source| HarnessError::io(&path, source))?;
        Ok(Self { path })
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        // Teardown runs on every exit path; a failure here must not mask the
        // scenario outcome.
        let _ = fs::remove_dir_all(&self.path);
    }
}
