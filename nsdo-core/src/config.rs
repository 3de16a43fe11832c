//! Registry configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{NamespaceKind, NamespaceName};

/// Registry of named network namespaces, as populated by `ip netns add`
pub const NETNS_DIR: &str = "/var/run/netns";

/// Registry of named mount namespaces
pub const MNTNS_DIR: &str = "/var/run/mntns";

/// Network namespace file of the calling process
pub const SELF_NETNS: &str = "/proc/self/ns/net";

/// Where namespaces are looked up.
///
/// The `nsdo` binary only ever uses [`RegistryConfig::default`]; the
/// builder methods exist for tests and embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Network namespace registry directory
    pub net_dir: PathBuf,

    /// Mount namespace registry directory
    pub mnt_dir: PathBuf,

    /// Namespace file identifying the caller's current network namespace
    pub self_net_ns: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            net_dir: PathBuf::from(NETNS_DIR),
            mnt_dir: PathBuf::from(MNTNS_DIR),
            self_net_ns: PathBuf::from(SELF_NETNS),
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with the well-known paths
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the network namespace registry
    #[must_use]
    pub fn with_net_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.net_dir = dir.into();
        self
    }

    /// Set the mount namespace registry
    #[must_use]
    pub fn with_mnt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mnt_dir = dir.into();
        self
    }

    /// Set the file used to identify the current network namespace
    #[must_use]
    pub fn with_self_net_ns(mut self, path: impl Into<PathBuf>) -> Self {
        self.self_net_ns = path.into();
        self
    }

    /// Registry directory for a namespace kind
    #[must_use]
    pub fn registry(&self, kind: NamespaceKind) -> &Path {
        match kind {
            NamespaceKind::Network => &self.net_dir,
            NamespaceKind::Mount => &self.mnt_dir,
        }
    }

    /// Full path of a registry entry
    #[must_use]
    pub fn entry(&self, kind: NamespaceKind, name: &NamespaceName) -> PathBuf {
        self.registry(kind).join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.net_dir, Path::new("/var/run/netns"));
        assert_eq!(config.mnt_dir, Path::new("/var/run/mntns"));
        assert_eq!(config.self_net_ns, Path::new("/proc/self/ns/net"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = RegistryConfig::new()
            .with_net_dir("/tmp/netns")
            .with_mnt_dir("/tmp/mntns");

        assert_eq!(config.registry(NamespaceKind::Network), Path::new("/tmp/netns"));
        assert_eq!(config.registry(NamespaceKind::Mount), Path::new("/tmp/mntns"));
        assert_eq!(config.self_net_ns, Path::new(SELF_NETNS));
    }

    #[test]
    fn test_entry_path() {
        let config = RegistryConfig::default();
        let name = NamespaceName::new("staging").unwrap();

        assert_eq!(
            config.entry(NamespaceKind::Network, &name),
            Path::new("/var/run/netns/staging")
        );
        assert_eq!(
            config.entry(NamespaceKind::Mount, &name),
            Path::new("/var/run/mntns/staging")
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"mnt_dir": "/run/custom-mntns"}"#).unwrap();

        assert_eq!(config.net_dir, Path::new(NETNS_DIR));
        assert_eq!(config.mnt_dir, Path::new("/run/custom-mntns"));
    }
}
