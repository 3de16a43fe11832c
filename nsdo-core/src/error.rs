//! Error types for nsdo
//!
//! Every variant belongs to exactly one failure class and therefore to
//! exactly one [`ExitStatus`]. The first failure wins: callers never
//! recover from any of these, they report and exit.

use std::path::PathBuf;

use thiserror::Error;

use crate::exit::ExitStatus;
use crate::types::NamespaceKind;

/// Hint emitted alongside a permission failure during `setns(2)`.
pub const SETUID_HINT: &str = "is the nsdo binary missing the setuid bit?";

/// nsdo error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Command line could not be parsed
    #[error("{message}")]
    Usage {
        /// Parser message
        message: String,
    },

    /// The process already lives in a registry-tracked network namespace
    #[error("oops! i can run only in network namespaces not found in {}", registry.display())]
    AlreadyConfined {
        /// Registry the current namespace was found in
        registry: PathBuf,
    },

    /// The current namespace identity could not be established
    #[error("{operation}(\"{}\"): {source}", path.display())]
    ConfinementCheck {
        /// Failing system call
        operation: &'static str,
        /// Path being inspected
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Namespace identifier is not allowed
    #[error("namespace names can't contain '/', be empty, or be '.' or '..' (got {name:?})")]
    InvalidName {
        /// Rejected identifier
        name: String,
    },

    /// Registry entry could not be opened
    #[error("open(\"{}\"): {source}", path.display())]
    NamespaceLookup {
        /// Kind of namespace being looked up
        kind: NamespaceKind,
        /// Registry entry path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// The kernel refused the namespace switch
    #[error("setns({kind}): {source}")]
    NamespaceSwitch {
        /// Kind of namespace being joined
        kind: NamespaceKind,
        /// Underlying errno
        #[source]
        source: nix::Error,
    },

    /// Current directory could not be read
    #[error("getcwd: {0}")]
    GetCwd(#[source] nix::Error),

    /// Saved directory could not be re-entered
    #[error("chdir(\"{}\"): {source}", path.display())]
    Chdir {
        /// Directory that was being restored
        path: PathBuf,
        /// Underlying errno
        #[source]
        source: nix::Error,
    },

    /// Effective identity could not be lowered to the real identity
    #[error("{operation}: {source}")]
    Deescalate {
        /// Failing system call
        operation: &'static str,
        /// Underlying errno
        #[source]
        source: nix::Error,
    },

    /// Identity check after lowering found an elevated id
    #[error("credentials still elevated after {operation}: expected {expected}, found {found:?}")]
    CredentialsRetained {
        /// Step that was verified
        operation: &'static str,
        /// Expected id for all three slots
        expected: u32,
        /// Observed (real, effective, saved) ids
        found: (u32, u32, u32),
    },

    /// Target command could not be executed
    #[error("execvp(\"{command}\"): {source}")]
    Exec {
        /// Command as given on the command line
        command: String,
        /// Underlying errno
        #[source]
        source: nix::Error,
    },

    /// Command or argument was not representable as a C string
    #[error("invalid argument {argument:?}: contains an interior NUL byte")]
    InvalidArgument {
        /// Offending argument
        argument: String,
    },
}

impl Error {
    /// Exit status the process terminates with when this error is fatal
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Usage { .. } => ExitStatus::BadInvocation,
            Self::AlreadyConfined { .. } | Self::ConfinementCheck { .. } => {
                ExitStatus::AlreadyConfined
            }
            // the network switch validates the identifier first, so a bad name
            // always surfaces as a bad network namespace
            Self::InvalidName { .. } => ExitStatus::BadNetworkNamespace,
            Self::NamespaceLookup { kind, .. }
            | Self::NamespaceSwitch { kind, .. } => match kind {
                NamespaceKind::Network => ExitStatus::BadNetworkNamespace,
                NamespaceKind::Mount => ExitStatus::BadMountNamespace,
            },
            Self::GetCwd(_) => ExitStatus::CouldNotGetcwd,
            Self::Chdir { .. } => ExitStatus::CouldNotChdir,
            Self::Deescalate { .. } | Self::CredentialsRetained { .. } => {
                ExitStatus::CouldNotDeescalate
            }
            Self::Exec { .. } | Self::InvalidArgument { .. } => ExitStatus::FailedExec,
        }
    }

    /// Operator hint for the most common misconfiguration, if it applies
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NamespaceSwitch {
                source: nix::Error::EPERM,
                ..
            } => Some(SETUID_HINT),
            _ => None,
        }
    }
}

/// Result type alias for nsdo operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_eperm_has_hint() {
        let err = Error::NamespaceSwitch {
            kind: NamespaceKind::Network,
            source: nix::Error::EPERM,
        };
        assert_eq!(err.hint(), Some(SETUID_HINT));
        assert_eq!(err.exit_status(), ExitStatus::BadNetworkNamespace);
    }

    #[test]
    fn test_other_switch_errors_have_no_hint() {
        let err = Error::NamespaceSwitch {
            kind: NamespaceKind::Mount,
            source: nix::Error::EINVAL,
        };
        assert_eq!(err.hint(), None);
        assert_eq!(err.exit_status(), ExitStatus::BadMountNamespace);
    }

    #[test]
    fn test_lookup_status_follows_kind() {
        let lookup = |kind| Error::NamespaceLookup {
            kind,
            path: PathBuf::from("/var/run/netns/missing"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        assert_eq!(
            lookup(NamespaceKind::Network).exit_status(),
            ExitStatus::BadNetworkNamespace
        );
        assert_eq!(
            lookup(NamespaceKind::Mount).exit_status(),
            ExitStatus::BadMountNamespace
        );
    }

    #[test]
    fn test_confinement_check_fails_closed() {
        let err = Error::ConfinementCheck {
            operation: "opendir",
            path: PathBuf::from("/var/run/netns"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.exit_status(), ExitStatus::AlreadyConfined);
        assert!(err.to_string().starts_with("opendir(\"/var/run/netns\"): "));
    }

    #[test]
    fn test_message_names_operation_and_cause() {
        let err = Error::Chdir {
            path: PathBuf::from("/srv/work"),
            source: nix::Error::ENOENT,
        };
        let msg = err.to_string();
        assert!(msg.contains("chdir(\"/srv/work\")"));
        assert!(msg.contains("No such file or directory"));
    }
}
