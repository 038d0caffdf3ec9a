//! Shared registry with linearizable mutation.

use std::{collections::HashMap, io::Write, sync::Arc};

use parking_lot::{Mutex, MutexGuard};

use crate::{
    blunder::{Blunder, CodeId},
    error::Result,
    registry::{ExportScope, Registry},
};

/// Cloneable handle to a registry behind a single lock.
///
/// Registration, reporting, merging and the exit-policy trigger all run
/// inside one critical section, so a uniqueness check and its insert are
/// atomic and a fatal report is in the history before `has_fatal` observes
/// it. Queries return owned snapshots.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl From<Registry> for SharedRegistry {
    fn from(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }
}

impl SharedRegistry {
    /// Creates a shared registry with default settings.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Label for this registry instance.
    ///
    /// # Returns
    ///
    /// A new `SharedRegistry`.
    pub fn new(identifier: impl Into<String>) -> Self {
        Registry::new(identifier).into()
    }

    /// Locks the registry for direct access.
    ///
    /// The guard allows both reads and mutation of the underlying `Registry`.
    /// Hold it only briefly; every reporter blocks on it, and calling any
    /// other method of this handle while holding it deadlocks.
    pub fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock()
    }

    pub fn register_code(&self, code: CodeId, code_name: impl Into<String>) -> bool {
        self.inner.lock().register_code(code, code_name)
    }

    pub fn report(&self, code: CodeId, message: impl Into<String>) -> Blunder {
        self.inner.lock().report(code, message)
    }

    pub fn report_fatal(&self, code: CodeId, message: impl Into<String>) -> Blunder {
        self.inner.lock().report_fatal(code, message)
    }

    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.inner.lock().has_fatal()
    }

    #[must_use]
    pub fn none_fatal(&self) -> bool {
        self.inner.lock().none_fatal()
    }

    #[must_use]
    pub fn reported(&self) -> Vec<Blunder> {
        self.inner.lock().reported().to_vec()
    }

    #[must_use]
    pub fn self_blunders(&self) -> Vec<Blunder> {
        self.inner.lock().self_blunders().to_vec()
    }

    #[must_use]
    pub fn fatals(&self) -> Vec<Blunder> {
        self.inner.lock().fatals().into_iter().cloned().collect()
    }

    #[must_use]
    pub fn non_fatals(&self) -> Vec<Blunder> {
        self.inner.lock().non_fatals().into_iter().cloned().collect()
    }

    #[must_use]
    pub fn by_code(&self, code: CodeId) -> Vec<Blunder> {
        self.inner.lock().by_code(code).into_iter().cloned().collect()
    }

    #[must_use]
    pub fn grouped_by_code(&self) -> HashMap<CodeId, Vec<Blunder>> {
        self.inner
            .lock()
            .grouped_by_code()
            .into_iter()
            .map(|(code, group)| (code, group.into_iter().cloned().collect()))
            .collect()
    }

    /// Merges `other`'s history into this registry.
    ///
    /// `other` is snapshotted before this registry is locked, so merging a
    /// handle into itself re-reports the snapshot instead of deadlocking.
    pub fn merge(&self, other: &SharedRegistry) {
        let incoming = other.reported();
        self.inner.lock().merge_blunders(&incoming);
    }

    /// Merges a plain registry's history into this registry.
    pub fn merge_registry(&self, other: &Registry) {
        self.inner.lock().merge(other);
    }

    /// Writes the history to `sink` under the lock.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Export` if the sink rejects the write.
    pub fn export_to<W: Write + ?Sized>(&self, sink: &mut W, scope: ExportScope) -> Result<()> {
        self.inner.lock().export_to(sink, scope)
    }
}
