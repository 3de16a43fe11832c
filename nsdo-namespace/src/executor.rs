//! The join sequence and the final exec
//!
//! Stages run strictly in order and the first failure ends the sequence:
//!
//! 1. refuse if already inside a registry-tracked network namespace
//! 2. join the network namespace (mandatory)
//! 3. save the working directory
//! 4. join the mount namespace of the same name (skipped if unregistered)
//! 5. restore the working directory
//! 6. lower credentials to the real user and group
//! 7. execvp the command
//!
//! Namespace switches already applied are never rolled back: on failure
//! the process simply exits.

use nix::unistd::execvp;
use nsdo_core::{Error, NamespaceKind, NamespaceName, RegistryConfig, Result, Stage};
use nsdo_security::{Credentials, Dropped, Privileged};
use std::convert::Infallible;
use std::ffi::{CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use tracing::{debug, info};

use crate::cwd::SavedCwd;
use crate::guard::ConfinementGuard;
use crate::switcher::{switch_namespace, Missing, SwitchOutcome};

fn reached(stage: Stage) {
    debug!(%stage, "Stage reached");
}

/// Joins registered namespaces and hands control to a command
#[derive(Debug, Clone)]
pub struct NamespaceExecutor {
    config: RegistryConfig,
}

impl NamespaceExecutor {
    /// Create an executor over the given registries
    #[must_use]
    pub const fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    /// Create an executor over the well-known registries
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RegistryConfig::default())
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Join `namespace` and replace the process image with `command`.
    ///
    /// `command[0]` is both the program looked up in `PATH` and the new
    /// image's `argv[0]`. Returns only on failure.
    ///
    /// # Errors
    /// The error of the first stage that failed
    pub fn execute(&self, namespace: &OsStr, command: &[OsString]) -> Result<Infallible> {
        reached(Stage::Start);

        if command.is_empty() {
            return Err(Error::Usage {
                message: "no command given".to_string(),
            });
        }
        reached(Stage::Validated);

        let joined = self.prepare(namespace)?;
        Err(joined.exec(command))
    }

    /// Run every stage up to and including credential de-escalation.
    ///
    /// The name is checked once, right after the confinement guard.
    ///
    /// # Errors
    /// The error of the first stage that failed
    pub fn prepare(&self, namespace: &OsStr) -> Result<Joined> {
        let credentials = Credentials::<Privileged>::capture()?;
        debug!(elevated = credentials.is_elevated(), "Starting join");

        ConfinementGuard::new(&self.config).ensure_unconfined()?;
        reached(Stage::Unconfined);

        let name = NamespaceName::new(namespace)?;

        switch_namespace(&name, &self.config, NamespaceKind::Network, Missing::Fail)?;
        reached(Stage::NetJoined);

        let cwd = SavedCwd::capture()?;
        reached(Stage::CwdSaved);

        let mount = switch_namespace(&name, &self.config, NamespaceKind::Mount, Missing::Skip)?;
        if mount == SwitchOutcome::Skipped {
            info!(namespace = %name, "No mount namespace registered, keeping current one");
        }
        reached(Stage::MountJoinAttempted);

        cwd.restore()?;
        reached(Stage::CwdRestored);

        let credentials = credentials.drop_privileges()?;
        reached(Stage::Deescalated);

        Ok(Joined {
            namespace: name,
            mount,
            credentials,
        })
    }
}

/// A process that has joined its namespaces and given up its privileges
#[derive(Debug)]
pub struct Joined {
    namespace: NamespaceName,
    mount: SwitchOutcome,
    credentials: Credentials<Dropped>,
}

impl Joined {
    /// Namespace that was joined
    #[must_use]
    pub const fn namespace(&self) -> &NamespaceName {
        &self.namespace
    }

    /// Whether a mount namespace was joined as well
    #[must_use]
    pub fn joined_mount(&self) -> bool {
        self.mount == SwitchOutcome::Joined
    }

    /// Lowered credentials the command will run with
    #[must_use]
    pub const fn credentials(&self) -> &Credentials<Dropped> {
        &self.credentials
    }

    /// Replace the process image with `command`. Returns only on failure.
    #[must_use]
    pub fn exec(self, command: &[OsString]) -> Error {
        dispatch(&self.credentials, command)
    }
}

/// Replace the process image with `command`, searching `PATH`.
///
/// Requires lowered credentials so the command can never start elevated.
/// The environment and every descriptor not marked close-on-exec are
/// inherited. Returns only on failure.
#[must_use]
pub fn dispatch(credentials: &Credentials<Dropped>, command: &[OsString]) -> Error {
    let Some(program) = command.first() else {
        return Error::Usage {
            message: "no command given".to_string(),
        };
    };

    let args: Vec<CString> = match command.iter().map(|arg| to_cstring(arg)).collect() {
        Ok(args) => args,
        Err(e) => return e,
    };

    reached(Stage::ExecDispatched);
    info!(
        command = %program.to_string_lossy(),
        uid = %credentials.effective_uid(),
        gid = %credentials.effective_gid(),
        "Executing"
    );

    // Only returns on failure
    match execvp(&args[0], &args) {
        Ok(never) => match never {},
        Err(source) => Error::Exec {
            command: program.to_string_lossy().into_owned(),
            source,
        },
    }
}

fn to_cstring(arg: &OsStr) -> Result<CString> {
    CString::new(arg.as_bytes()).map_err(|_| Error::InvalidArgument {
        argument: arg.to_string_lossy().into_owned(),
    })
}
