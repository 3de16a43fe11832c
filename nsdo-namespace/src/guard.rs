//! Refuse to run from inside a registry-tracked network namespace

use nsdo_core::{Error, RegistryConfig, Result};
use std::path::PathBuf;
use tracing::debug;

use crate::registry::{Presence, Registry, ScanError};

/// Current-namespace guard
#[derive(Debug, Clone)]
pub struct ConfinementGuard {
    registry: Registry,
    self_ns: PathBuf,
}

impl ConfinementGuard {
    /// Guard checking `config.self_net_ns` against the network registry
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            registry: Registry::new(&config.net_dir),
            self_ns: config.self_net_ns.clone(),
        }
    }

    /// Whether the process must not proceed.
    ///
    /// Any failure to establish the answer counts as confined.
    #[must_use]
    pub fn already_confined(&self) -> bool {
        self.ensure_unconfined().is_err()
    }

    /// Succeed only if the current network namespace is not in the registry
    ///
    /// # Errors
    /// [`Error::AlreadyConfined`] when a registry entry matches, and
    /// [`Error::ConfinementCheck`] when the identity lookup or the
    /// directory scan fails
    pub fn ensure_unconfined(&self) -> Result<()> {
        let current = Registry::identity(&self.self_ns).map_err(check_failed)?;
        debug!(id = %current, path = %self.self_ns.display(), "Current network namespace");

        match self.registry.find(current).map_err(check_failed)? {
            Presence::Absent => Ok(()),
            Presence::Found(entry) => {
                debug!(entry = %entry.display(), "Already inside a registry namespace");
                Err(Error::AlreadyConfined {
                    registry: self.registry.dir().to_path_buf(),
                })
            }
        }
    }
}

fn check_failed(err: ScanError) -> Error {
    Error::ConfinementCheck {
        operation: err.operation,
        path: err.path,
        source: err.source,
    }
}
