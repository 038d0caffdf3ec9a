//! Text and JSON export of registry history.

use std::{collections::BTreeMap, io::Write};

use {serde::Serialize, serde_json::to_string_pretty};

use crate::{
    blunder::{Blunder, CodeId},
    error::Result,
    registry::Registry,
};

/// Which history an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// Only user-reported blunders.
    #[default]
    Reported,
    /// User-reported blunders followed by self-blunders.
    Full,
}

/// Serializable view of a registry.
#[derive(Serialize)]
struct RegistrySnapshot<'a> {
    identifier: &'a str,
    codes: BTreeMap<CodeId, &'a str>,
    has_fatal: bool,
    reported: &'a [Blunder],
    self_blunders: &'a [Blunder],
}

impl Registry {
    /// Renders blunders as identifier-prefixed log lines.
    ///
    /// # Arguments
    ///
    /// * `blunders` - Blunders to render, in output order.
    ///
    /// # Returns
    ///
    /// One `<identifier>-Blunder, <rendering>` line per blunder, each
    /// terminated by a newline.
    #[must_use]
    pub fn log_string(&self, blunders: &[Blunder]) -> String {
        blunders
            .iter()
            .map(|blunder| format!("{}-Blunder, {blunder}\n", self.identifier))
            .collect()
    }

    /// Writes the history to a caller-supplied sink.
    ///
    /// The sink's lifecycle stays with the caller; this only writes to it.
    ///
    /// # Arguments
    ///
    /// * `sink` - Destination for the rendered lines.
    /// * `scope` - Whether self-blunders are included.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Export` if the sink rejects the write.
    pub fn export_to<W: Write + ?Sized>(&self, sink: &mut W, scope: ExportScope) -> Result<()> {
        let mut text = self.log_string(&self.reported);
        if scope == ExportScope::Full {
            text.push_str(&self.log_string(&self.self_blunders));
        }
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Serializes the registry for diagnostics tooling.
    ///
    /// Codes are emitted sorted by id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Serialization` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let snapshot = RegistrySnapshot {
            identifier: &self.identifier,
            codes: self
                .codes
                .iter()
                .map(|(code, name)| (*code, name.as_str()))
                .collect(),
            has_fatal: self.has_fatal,
            reported: &self.reported,
            self_blunders: &self.self_blunders,
        };
        Ok(to_string_pretty(&snapshot)?)
    }
}
