//! Configuration module.
//!
//! This module provides functionality for loading the provider table and
//! the hostname list a scan runs over.

pub mod hosts;
pub mod loader;

pub use hosts::{default_hostnames, hostnames_or_default, DEFAULT_HOSTNAMES};
pub use loader::ConfigLoader;
