//! Domain-specific error types using `thiserror`.
//!
//! Misuse of a registry is never an error: it is recorded as a self-blunder.
//! These types cover the few operations that hand a failure back to the
//! caller, all of which involve an external collaborator or an unsupported
//! request.

use std::{io::Error as IoError, result::Result as StdResult};

use {serde_json::Error as SerdeJsonError, thiserror::Error};

use crate::blunder::CodeId;

/// Registry-related errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Codes form a fixed taxonomy and can never be removed.
    #[error("Unregistering codes is not supported (code {code})")]
    UnregisterUnsupported { code: CodeId },
    /// The export sink rejected a write.
    #[error("Export error: {0}")]
    Export(#[from] IoError),
    /// Registry history could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
}

/// Result alias for registry operations that can fail.
pub type Result<T> = StdResult<T, RegistryError>;
