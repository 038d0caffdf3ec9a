//! Registry configuration.
//!
//! This module provides the serializable registry settings and the XDG
//! compliant location used for dump-on-fatal artifacts.

pub mod settings;

pub use settings::{ConfigError, RegistryConfig, get_dump_dir};
