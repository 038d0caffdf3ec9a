//! Exit-on-fatal policy.
//!
//! When attached to a registry, every fatal report dumps the full history to
//! a timestamped log file and then terminates the process. If the file
//! cannot be produced, the failure is recorded as a self-blunder and the dump
//! goes to standard output instead.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs::{File, OpenOptions, create_dir_all},
    io::{ErrorKind::AlreadyExists, stdout},
    path::{Path, PathBuf},
    process::exit,
    sync::Arc,
};

use {
    anyhow::Result as AnyhowResult,
    chrono::Utc,
    tracing::{error, info},
};

use crate::{
    config::RegistryConfig,
    error::{BlunderReporter, ResultExt},
    registry::{ExportScope, Registry},
};

/// Called with the exit status once the dump is written.
pub type TerminateHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Per-registry dump-and-exit settings.
#[derive(Clone)]
pub struct ExitPolicy {
    /// Directory the dump file is created in.
    dump_dir: PathBuf,
    /// Status passed to the terminate hook.
    exit_code: i32,
    /// Terminates the process.
    terminate: TerminateHook,
}

impl Debug for ExitPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExitPolicy")
            .field("dump_dir", &self.dump_dir)
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}

fn exit_process(code: i32) {
    exit(code)
}

impl ExitPolicy {
    /// Creates a policy that dumps into `dump_dir` and exits with status 1.
    ///
    /// # Arguments
    ///
    /// * `dump_dir` - Directory for dump files, created on demand.
    ///
    /// # Returns
    ///
    /// A new `ExitPolicy` that terminates the process.
    pub fn new(dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            dump_dir: dump_dir.into(),
            exit_code: 1,
            terminate: Arc::new(exit_process),
        }
    }

    /// Builds the policy described by `config`, if it enables one.
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Option<Self> {
        config
            .exit_on_fatal
            .then(|| Self::new(config.resolved_dump_dir()).with_exit_code(config.exit_code))
    }

    #[must_use]
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    /// Replaces process termination with `hook`.
    ///
    /// Embedders use this to unwind their own runtime before exiting; tests
    /// use it to observe the policy without ending the process.
    ///
    /// The hook runs while the reporting registry is still borrowed. Behind a
    /// `SharedRegistry` that means its lock is held: a hook calling back into
    /// the same `SharedRegistry` deadlocks.
    #[must_use]
    pub fn with_terminate_hook(mut self, hook: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.terminate = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn dump_dir(&self) -> &Path {
        &self.dump_dir
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// File name prefix for `identifier` at the current time, to the millisecond.
    fn dump_prefix(identifier: &str) -> String {
        let stem: String = identifier
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        let stamp = Utc::now().format("%Y%m%d-%H%M%S-%3f");
        format!("{stem}-blunders-{stamp}")
    }

    /// Creates a fresh dump file, never reusing an existing one.
    ///
    /// Names that are already taken get a `-<n>` suffix.
    fn create_dump(&self, identifier: &str) -> AnyhowResult<(PathBuf, File)> {
        create_dir_all(&self.dump_dir)
            .add_contextf(format_args!("Creating dump directory {:?}", self.dump_dir))?;

        let prefix = Self::dump_prefix(identifier);
        let mut attempt: u32 = 0;
        loop {
            let path = match attempt {
                0 => self.dump_dir.join(format!("{prefix}.log")),
                n => self.dump_dir.join(format!("{prefix}-{n}.log")),
            };
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == AlreadyExists => attempt += 1,
                Err(e) => {
                    return Err(e).add_contextf(format_args!("Creating dump file {path:?}"));
                }
            }
        }
    }
}

/// Dumps `registry`'s full history per `policy`, then terminates.
pub(crate) fn trigger(registry: &mut Registry, policy: &ExitPolicy) {
    let written = policy
        .create_dump(registry.identifier())
        .and_then(|(path, mut file)| {
            registry
                .export_to(&mut file, ExportScope::Full)
                .add_contextf(format_args!("Writing dump file {path:?}"))?;
            Ok(path)
        });

    match written {
        Ok(path) => info!(registry = registry.identifier(), "Dumped blunders to {:?}", path),
        Err(failure) => {
            registry.record_self_blunder(format!(
                "Failed to dump blunders to file: {}",
                BlunderReporter::to_message(&failure)
            ));
            if let Err(e) = registry
                .export_to(&mut stdout().lock(), ExportScope::Full)
                .add_context("Writing dump to stdout")
            {
                error!(
                    registry = registry.identifier(),
                    "{}",
                    BlunderReporter::to_message(&e)
                );
            }
        }
    }

    (policy.terminate)(policy.exit_code);
}
