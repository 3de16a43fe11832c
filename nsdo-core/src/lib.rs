//! nsdo core - error taxonomy, exit statuses and validated types
//!
//! This crate provides the values shared by every stage of a namespace join.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod exit;
pub mod types;

pub use config::RegistryConfig;
pub use error::{Error, Result, SETUID_HINT};
pub use exit::ExitStatus;
pub use types::{NamespaceId, NamespaceKind, NamespaceName, Stage};
