//! Per-component blunder registry.
//!
//! A `Registry` owns a fixed taxonomy of classification codes and the
//! chronological history of everything reported against it. Misuse of the
//! registry (duplicate codes, unknown codes, failed dumps) never fails the
//! calling operation; it is recorded as a self-blunder in a separate list.

use std::collections::HashMap;

use {
    chrono::{DateTime, Utc},
    tracing::debug,
};

use crate::{
    blunder::{Blunder, CodeId, SENTINEL_CODE, SENTINEL_NAME},
    config::RegistryConfig,
    error::{BlunderReporter, RegistryError, Result},
    policy::{ExitPolicy, exit::trigger},
};

pub mod export;

mod tests;

pub use export::ExportScope;

/// Aggregator of classification codes and reported blunders for one logical
/// unit of work.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Label naming this registry in logs and exports.
    identifier: String,
    /// Code id to code name. Always contains the sentinel entry.
    codes: HashMap<CodeId, String>,
    /// User-reported blunders, in report order.
    reported: Vec<Blunder>,
    /// Blunders about misuse of the registry itself, in report order.
    self_blunders: Vec<Blunder>,
    /// Set once any fatal blunder is reported; never reset.
    has_fatal: bool,
    /// Whether new blunders are timestamped.
    timestamps: bool,
    /// Dump-and-exit behavior on fatal reports, when enabled.
    exit_policy: Option<ExitPolicy>,
}

impl Registry {
    /// Creates a registry with default settings.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Label for this registry instance.
    ///
    /// # Returns
    ///
    /// A new `Registry` holding only the sentinel code.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self::with_config(identifier, &RegistryConfig::default())
    }

    /// Creates a registry from explicit settings.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Label for this registry instance.
    /// * `config` - Timestamping and exit-policy settings.
    ///
    /// # Returns
    ///
    /// A new `Registry` holding only the sentinel code.
    pub fn with_config(identifier: impl Into<String>, config: &RegistryConfig) -> Self {
        let mut codes = HashMap::new();
        codes.insert(SENTINEL_CODE, SENTINEL_NAME.to_string());

        Self {
            identifier: identifier.into(),
            codes,
            reported: Vec::new(),
            self_blunders: Vec::new(),
            has_fatal: false,
            timestamps: config.timestamps,
            exit_policy: ExitPolicy::from_config(config),
        }
    }

    /// Attaches an exit policy, replacing any configured one.
    #[must_use]
    pub fn with_exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn codes(&self) -> &HashMap<CodeId, String> {
        &self.codes
    }

    /// Looks up the name registered for `code`.
    #[must_use]
    pub fn code_name(&self, code: CodeId) -> Option<&str> {
        self.codes.get(&code).map(String::as_str)
    }

    #[must_use]
    pub fn reported(&self) -> &[Blunder] {
        &self.reported
    }

    #[must_use]
    pub fn self_blunders(&self) -> &[Blunder] {
        &self.self_blunders
    }

    #[must_use]
    pub fn exit_policy(&self) -> Option<&ExitPolicy> {
        self.exit_policy.as_ref()
    }

    /// Registers a new classification code.
    ///
    /// Registration is rejected when either the id or the name (exact,
    /// case-sensitive match) is already present, which includes the
    /// sentinel. A rejected registration records one self-blunder naming the
    /// collision and leaves the code table unchanged.
    ///
    /// # Arguments
    ///
    /// * `code` - Code id to register.
    /// * `code_name` - Human-readable name for the code.
    ///
    /// # Returns
    ///
    /// `true` if the code was registered, `false` otherwise.
    pub fn register_code(&mut self, code: CodeId, code_name: impl Into<String>) -> bool {
        let code_name = code_name.into();

        if self.codes.contains_key(&code) {
            self.record_self_blunder(format!("Attempted to use existing Code id \"{code}\"."));
            return false;
        }
        if self.codes.values().any(|existing| *existing == code_name) {
            self.record_self_blunder(format!(
                "Attempted to use existing Code name \"{code_name}\"."
            ));
            return false;
        }

        debug!(registry = %self.identifier, code, code_name = %code_name, "Registered code");
        self.codes.insert(code, code_name);
        true
    }

    /// Codes are a fixed taxonomy for the registry's lifetime and are never
    /// removed. This never mutates the registry.
    ///
    /// # Errors
    ///
    /// Always returns `RegistryError::UnregisterUnsupported`.
    pub fn unregister_code(&self, code: CodeId) -> Result<()> {
        Err(RegistryError::UnregisterUnsupported { code })
    }

    /// Records a non-fatal blunder.
    ///
    /// An unregistered `code` falls back to the sentinel code and records a
    /// self-blunder; the report itself is never lost.
    ///
    /// # Arguments
    ///
    /// * `code` - Registered code id.
    /// * `message` - Description of what went wrong.
    ///
    /// # Returns
    ///
    /// The recorded `Blunder`.
    pub fn report(&mut self, code: CodeId, message: impl Into<String>) -> Blunder {
        let time = self.now();
        self.record(code, false, message.into(), time)
    }

    /// Records a fatal blunder.
    ///
    /// Same fallback rules as [`Registry::report`]. Marks the registry as
    /// fatal for the rest of its lifetime and triggers the exit policy, if
    /// one is attached.
    ///
    /// # Arguments
    ///
    /// * `code` - Registered code id.
    /// * `message` - Description of what went wrong.
    ///
    /// # Returns
    ///
    /// The recorded `Blunder`.
    pub fn report_fatal(&mut self, code: CodeId, message: impl Into<String>) -> Blunder {
        let time = self.now();
        self.record(code, true, message.into(), time)
    }

    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.has_fatal
    }

    #[must_use]
    pub fn none_fatal(&self) -> bool {
        !self.has_fatal
    }

    /// Fatal blunders, in report order.
    #[must_use]
    pub fn fatals(&self) -> Vec<&Blunder> {
        self.reported.iter().filter(|b| b.is_fatal()).collect()
    }

    /// Non-fatal blunders, in report order.
    #[must_use]
    pub fn non_fatals(&self) -> Vec<&Blunder> {
        self.reported.iter().filter(|b| !b.is_fatal()).collect()
    }

    /// Blunders recorded under `code`, in report order.
    #[must_use]
    pub fn by_code(&self, code: CodeId) -> Vec<&Blunder> {
        self.reported.iter().filter(|b| b.code() == code).collect()
    }

    /// Groups reported blunders by code.
    ///
    /// Each group keeps report order. The enumeration order of the groups
    /// themselves is unspecified.
    #[must_use]
    pub fn grouped_by_code(&self) -> HashMap<CodeId, Vec<&Blunder>> {
        let mut groups: HashMap<CodeId, Vec<&Blunder>> = HashMap::new();
        for blunder in &self.reported {
            groups.entry(blunder.code()).or_default().push(blunder);
        }
        groups
    }

    /// Concatenation of [`Registry::grouped_by_code`]'s groups.
    #[must_use]
    pub fn ordered_by_code(&self) -> Vec<&Blunder> {
        self.grouped_by_code().into_values().flatten().collect()
    }

    /// Re-reports every blunder of `other` into this registry.
    ///
    /// Entries pass through this registry's own code table: a code unknown
    /// here falls back to the sentinel and records a self-blunder, even if
    /// `other` knew it. Severity, message and original timestamp are kept.
    ///
    /// # Arguments
    ///
    /// * `other` - Registry whose history is merged in.
    pub fn merge(&mut self, other: &Registry) {
        debug!(
            registry = %self.identifier,
            from = %other.identifier,
            count = other.reported.len(),
            "Merging registry"
        );
        self.merge_blunders(&other.reported);
    }

    /// Re-reports a sequence of blunders, as [`Registry::merge`] does.
    pub(crate) fn merge_blunders(&mut self, blunders: &[Blunder]) {
        for blunder in blunders {
            let time = blunder.time().or_else(|| self.now());
            self.record(
                blunder.code(),
                blunder.is_fatal(),
                blunder.message().to_owned(),
                time,
            );
        }
    }

    /// Records a self-blunder under the sentinel code.
    pub(crate) fn record_self_blunder(&mut self, message: String) {
        let blunder = build(SENTINEL_CODE, SENTINEL_NAME, false, message, self.now());
        BlunderReporter::self_blunder(&self.identifier, &blunder);
        self.self_blunders.push(blunder);
    }

    fn record(
        &mut self,
        requested: CodeId,
        fatal: bool,
        message: String,
        time: Option<DateTime<Utc>>,
    ) -> Blunder {
        let (code, code_name) = match self.codes.get(&requested) {
            Some(name) => (requested, name.clone()),
            None => {
                self.record_self_blunder(format!(
                    "Attempted to use unregistered Code id \"{requested}\"."
                ));
                (SENTINEL_CODE, SENTINEL_NAME.to_string())
            }
        };

        let blunder = build(code, code_name, fatal, message, time);
        BlunderReporter::reported(&self.identifier, &blunder);
        self.reported.push(blunder.clone());

        if fatal {
            self.has_fatal = true;
            if let Some(policy) = self.exit_policy.clone() {
                trigger(self, &policy);
            }
        }

        blunder
    }

    fn now(&self) -> Option<DateTime<Utc>> {
        self.timestamps.then(Utc::now)
    }
}

fn build(
    code: CodeId,
    code_name: impl Into<String>,
    fatal: bool,
    message: String,
    time: Option<DateTime<Utc>>,
) -> Blunder {
    match time {
        Some(time) => Blunder::with_time(code, code_name, fatal, message, time),
        None => Blunder::new(code, code_name, fatal, message),
    }
}
