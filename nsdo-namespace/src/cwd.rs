//! Working-directory preservation across a mount namespace switch
//!
//! Joining a mount namespace resets the root and current directory of the
//! caller. The absolute path is taken beforehand and entered again right
//! after the switch.

use nix::unistd::{chdir, getcwd};
use nsdo_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Absolute working directory captured before a mount namespace switch
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a captured directory must be restored"]
pub struct SavedCwd(PathBuf);

impl SavedCwd {
    /// Capture the current working directory
    ///
    /// # Errors
    /// [`Error::GetCwd`] if the directory cannot be resolved, e.g. because
    /// it has been removed
    pub fn capture() -> Result<Self> {
        let path = getcwd().map_err(Error::GetCwd)?;
        debug!(cwd = %path.display(), "Saved working directory");
        Ok(Self(path))
    }

    /// Captured path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Change into the captured path. Consumes the capture so it is applied once.
    ///
    /// # Errors
    /// [`Error::Chdir`] if the path cannot be entered
    pub fn restore(self) -> Result<()> {
        chdir(self.0.as_path()).map_err(|source| Error::Chdir {
            path: self.0.clone(),
            source,
        })?;
        debug!(cwd = %self.0.display(), "Restored working directory");
        Ok(())
    }
}
