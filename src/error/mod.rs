//! Error handling for the registry and its collaborators.
//!
//! Domain errors are `thiserror` enums; operational context and structured
//! logging of blunders live in [`operational`].

pub mod domain;
pub mod operational;

pub use {
    domain::{RegistryError, Result},
    operational::{BlunderReporter, ResultExt},
};
