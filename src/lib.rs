//! Blunders - Classified Error Registry
//!
//! Augments plain errors with a classification code, a human-readable code
//! name, a severity flag, a message and a timestamp, and aggregates them in a
//! per-component registry that enforces code uniqueness, tracks fatal
//! occurrences and exports its history for diagnostics.

pub mod blunder;
pub mod config;
pub mod error;
pub mod policy;
pub mod registry;
pub mod state;

// Re-export key types for convenience
pub use {
    blunder::{Blunder, CodeId, SENTINEL_CODE, SENTINEL_NAME},
    config::{ConfigError, RegistryConfig},
    error::RegistryError,
    policy::ExitPolicy,
    registry::{ExportScope, Registry},
    state::SharedRegistry,
};
