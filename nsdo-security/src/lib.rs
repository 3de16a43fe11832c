//! Privilege handling for a set-user-ID nsdo
//!
//! Credentials are carried as a typestate: a [`Credentials<Privileged>`]
//! can be lowered exactly once into a [`Credentials<Dropped>`], and no
//! operation leads back.

#![warn(missing_docs, clippy::all, clippy::pedantic)]

pub mod credentials;

pub use credentials::{Credentials, Dropped, Privileged};
