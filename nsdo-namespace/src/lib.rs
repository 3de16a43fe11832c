//! Joining administrator-registered namespaces
//!
//! This crate moves the calling process into pre-existing namespaces:
//! - Network namespace - looked up in `/var/run/netns`, mandatory
//! - Mount namespace - looked up in `/var/run/mntns`, joined when present
//!
//! and then hands control to a command with the caller's real identity.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod cwd;
pub mod executor;
pub mod guard;
pub mod registry;
pub mod switcher;

pub use cwd::SavedCwd;
pub use executor::{dispatch, Joined, NamespaceExecutor};
pub use guard::ConfinementGuard;
pub use registry::{Presence, Registry};
pub use switcher::{switch_namespace, Missing, SwitchOutcome};
