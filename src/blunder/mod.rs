//! The `Blunder` record type.
//!
//! A `Blunder` is an error enriched with a classification code, the code's
//! human-readable name, a severity flag, the reporter's message and an
//! optional creation timestamp. Records are immutable once built.

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

use {
    chrono::{DateTime, SecondsFormat::Millis, Utc},
    serde::{Deserialize, Serialize},
};

/// Identifier of a classification code.
pub type CodeId = i64;

/// Code reserved for fallback reports and self-blunders.
pub const SENTINEL_CODE: CodeId = 0;

/// Name bound to [`SENTINEL_CODE`] in every registry.
pub const SENTINEL_NAME: &str = "SelfBlunder";

/// One reported error event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blunder {
    /// Classification code.
    code: CodeId,
    /// Name bound to `code` when the record was created.
    code_name: String,
    /// Severity flag.
    fatal: bool,
    /// Free-text description supplied by the reporter.
    message: String,
    /// Creation time, when timestamping is enabled.
    time: Option<DateTime<Utc>>,
}

impl Blunder {
    /// Creates an untimed blunder.
    ///
    /// No validation is performed: empty messages and negative or zero codes
    /// are accepted as-is.
    ///
    /// # Arguments
    ///
    /// * `code` - Classification code.
    /// * `code_name` - Human-readable name of the code.
    /// * `fatal` - Whether the blunder is fatal.
    /// * `message` - Description of what went wrong.
    ///
    /// # Returns
    ///
    /// A new `Blunder` without a timestamp.
    pub fn new(
        code: CodeId,
        code_name: impl Into<String>,
        fatal: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            code_name: code_name.into(),
            fatal,
            message: message.into(),
            time: None,
        }
    }

    /// Creates a blunder stamped with `time`.
    ///
    /// # Arguments
    ///
    /// * `code` - Classification code.
    /// * `code_name` - Human-readable name of the code.
    /// * `fatal` - Whether the blunder is fatal.
    /// * `message` - Description of what went wrong.
    /// * `time` - When the blunder happened.
    ///
    /// # Returns
    ///
    /// A new timed `Blunder`.
    pub fn with_time(
        code: CodeId,
        code_name: impl Into<String>,
        fatal: bool,
        message: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            time: Some(time),
            ..Self::new(code, code_name, fatal, message)
        }
    }

    #[must_use]
    pub fn code(&self) -> CodeId {
        self.code
    }

    #[must_use]
    pub fn code_name(&self) -> &str {
        &self.code_name
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Label used in the rendered form.
    ///
    /// # Returns
    ///
    /// `"FATAL BLUNDER"` or `"NON-FATAL BLUNDER"`.
    #[must_use]
    pub fn severity_label(&self) -> &'static str {
        if self.fatal {
            "FATAL BLUNDER"
        } else {
            "NON-FATAL BLUNDER"
        }
    }
}

impl Display for Blunder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} encountered, CODE: {} ({}), \"{}\"",
            self.severity_label(),
            self.code,
            self.code_name,
            self.message
        )?;
        if let Some(time) = self.time {
            write!(f, ", AT: {}", time.to_rfc3339_opts(Millis, true))?;
        }
        Ok(())
    }
}

impl Error for Blunder {}
