//! Joining a registered namespace with setns(2)

use nix::sched::setns;
use nsdo_core::{Error, NamespaceKind, NamespaceName, RegistryConfig, Result};
use std::fs::File;
use std::io;
use tracing::{debug, info};

/// What to do when the registry has no entry for the name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// A missing entry is an error
    Fail,
    /// A missing entry leaves the namespace untouched
    Skip,
}

/// Result of a successful [`switch_namespace`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The process now belongs to the registered namespace
    Joined,
    /// No entry existed and [`Missing::Skip`] was requested
    Skipped,
}

/// Move the calling process into the `kind` registry entry for `name`.
///
/// The namespace file is opened close-on-exec and closed again once the
/// switch returns.
///
/// # Errors
/// - [`Error::NamespaceLookup`] if the entry cannot be opened (a missing
///   entry only when `missing` is [`Missing::Fail`])
/// - [`Error::NamespaceSwitch`] if the kernel rejects the switch
pub fn switch_namespace(
    name: &NamespaceName,
    config: &RegistryConfig,
    kind: NamespaceKind,
    missing: Missing,
) -> Result<SwitchOutcome> {
    let path = config.entry(kind, name);

    // std opens every file with O_CLOEXEC
    let handle = match File::open(&path) {
        Ok(handle) => handle,
        Err(e) if e.kind() == io::ErrorKind::NotFound && missing == Missing::Skip => {
            debug!(path = %path.display(), %kind, "No registry entry, skipping");
            return Ok(SwitchOutcome::Skipped);
        }
        Err(source) => {
            return Err(Error::NamespaceLookup { kind, path, source });
        }
    };

    debug!(path = %path.display(), %kind, "Opened namespace file");

    setns(&handle, kind.clone_flag()).map_err(|source| Error::NamespaceSwitch { kind, source })?;

    info!(namespace = %name, %kind, "Joined namespace");

    Ok(SwitchOutcome::Joined)
}
