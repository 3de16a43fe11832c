//! Core type definitions with strong typing and validation

use nix::sched::CloneFlags;
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::str::FromStr;

use crate::{Error, Result};

/// Namespace identifier, safe to join onto a registry directory.
///
/// Kept as raw OS bytes: a registry entry may be named by any byte string
/// the filesystem accepts, UTF-8 or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NamespaceName(OsString);

impl NamespaceName {
    /// Create a new `NamespaceName` with validation
    ///
    /// # Errors
    /// Returns error if the name is empty, `.`, `..`, or contains `/`
    pub fn new(name: impl Into<OsString>) -> Result<Self> {
        let name = name.into();
        if !Self::is_valid(&name) {
            return Err(Error::InvalidName {
                name: name.to_string_lossy().into_owned(),
            });
        }
        Ok(Self(name))
    }

    /// Check whether `name` may be used as a registry entry name.
    ///
    /// Pure byte check, no filesystem access.
    #[must_use]
    pub fn is_valid(name: &OsStr) -> bool {
        let bytes = name.as_bytes();
        !(bytes.is_empty() || bytes == b"." || bytes == b".." || bytes.contains(&b'/'))
    }

    /// Get the name as an OS string slice
    #[must_use]
    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_string_lossy())
    }
}

impl FromStr for NamespaceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<OsString> for NamespaceName {
    type Error = Error;

    fn try_from(s: OsString) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&OsStr> for NamespaceName {
    type Error = Error;

    fn try_from(s: &OsStr) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<OsStr> for NamespaceName {
    fn as_ref(&self) -> &OsStr {
        &self.0
    }
}

impl AsRef<std::path::Path> for NamespaceName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

/// Namespace kinds nsdo can join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
    /// Network namespace
    Network,
    /// Mount namespace
    Mount,
}

impl NamespaceKind {
    /// Flag passed to setns(2)
    #[must_use]
    pub const fn clone_flag(self) -> CloneFlags {
        match self {
            Self::Network => CloneFlags::CLONE_NEWNET,
            Self::Mount => CloneFlags::CLONE_NEWNS,
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Network => "CLONE_NEWNET",
            Self::Mount => "CLONE_NEWNS",
        })
    }
}

/// Kernel identity of a namespace file.
///
/// Two paths refer to the same namespace exactly when their device and
/// inode numbers match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceId {
    dev: u64,
    ino: u64,
}

impl NamespaceId {
    /// Create from raw device and inode numbers
    #[must_use]
    pub const fn from_raw(dev: u64, ino: u64) -> Self {
        Self { dev, ino }
    }
}

impl From<&std::fs::Metadata> for NamespaceId {
    fn from(meta: &std::fs::Metadata) -> Self {
        Self::from_raw(meta.dev(), meta.ino())
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.dev, self.ino)
    }
}

/// Stages of a join, in the order they are passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Nothing done yet
    Start,
    /// Arguments accepted
    Validated,
    /// Confinement guard passed
    Unconfined,
    /// Network namespace joined
    NetJoined,
    /// Working directory captured
    CwdSaved,
    /// Mount namespace joined or skipped
    MountJoinAttempted,
    /// Working directory re-entered
    CwdRestored,
    /// Credentials lowered to the real identity
    Deescalated,
    /// Process image about to be replaced
    ExecDispatched,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Validated => "validated",
            Self::Unconfined => "unconfined",
            Self::NetJoined => "net-joined",
            Self::CwdSaved => "cwd-saved",
            Self::MountJoinAttempted => "mount-join-attempted",
            Self::CwdRestored => "cwd-restored",
            Self::Deescalated => "deescalated",
            Self::ExecDispatched => "exec-dispatched",
        })
    }
}
