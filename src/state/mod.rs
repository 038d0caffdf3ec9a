//! Thread-safe registry sharing.
//!
//! This module provides `SharedRegistry`, which lets several execution
//! contexts report into one registry.

pub mod shared_registry;

pub use shared_registry::SharedRegistry;
