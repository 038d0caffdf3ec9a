//! Operational error context propagation with `anyhow`.
//!
//! This module provides the context extension trait used when building
//! failure descriptions, and the structured logging of recorded blunders.

use std::{error::Error as StdError, fmt::Display};

use {
    anyhow::{Context, Error, Result as AnyhowResult},
    tracing::{debug, error, warn},
};

use crate::blunder::Blunder;

/// Extension trait for enhanced error context.
///
/// This trait provides methods to add contextual information to errors,
/// so failures recorded as self-blunders say what was being attempted.
pub trait ResultExt<T, E> {
    /// Adds context to an error with a static string.
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;

    /// Adds context to an error with a formatted string.
    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(context)
    }

    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(format.to_string())
    }
}

/// Centralized logging of recorded blunders.
///
/// Every record a registry keeps is mirrored to `tracing` so that
/// applications with a subscriber see blunders as they happen, without
/// waiting for an export.
pub struct BlunderReporter;

impl BlunderReporter {
    /// Logs a user-reported blunder.
    ///
    /// Fatal blunders are logged at error level, others at debug level.
    ///
    /// # Arguments
    ///
    /// * `registry` - Identifier of the recording registry.
    /// * `blunder` - The recorded blunder.
    pub fn reported(registry: &str, blunder: &Blunder) {
        if blunder.is_fatal() {
            error!(
                registry = registry,
                code = blunder.code(),
                code_name = blunder.code_name(),
                "{}",
                blunder.message()
            );
        } else {
            debug!(
                registry = registry,
                code = blunder.code(),
                code_name = blunder.code_name(),
                "{}",
                blunder.message()
            );
        }
    }

    /// Logs a self-blunder (misuse of the registry itself).
    ///
    /// # Arguments
    ///
    /// * `registry` - Identifier of the recording registry.
    /// * `blunder` - The recorded self-blunder.
    pub fn self_blunder(registry: &str, blunder: &Blunder) {
        warn!(registry = registry, "Self-blunder: {}", blunder.message());
    }

    /// Flattens an error chain into a single line.
    ///
    /// # Returns
    ///
    /// The error and each of its causes, separated by `": "`.
    #[must_use]
    pub fn to_message(error: &Error) -> String {
        format!("{error:#}")
    }
}
