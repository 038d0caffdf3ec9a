//! Registry settings with XDG Base Directory compliance.
//!
//! Settings are plain serde values. Loading is optional: a registry built
//! with [`RegistryConfig::default`] never touches the filesystem.

use std::{
    env::var,
    fs::read_to_string,
    io::Error as StdError,
    path::{Path, PathBuf},
};

use {
    serde::{Deserialize, Serialize},
    serde_json::{Error as SerdeJsonError, from_str},
    thiserror::Error,
    tracing::debug,
};

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to deserialize the configuration.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
    /// Invalid configuration value.
    #[error("Invalid config value: {reason}")]
    InvalidValue { reason: String },
}

/// Serializable registry settings with default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Whether new blunders carry a creation timestamp.
    pub timestamps: bool,
    /// Whether a fatal report dumps the history and terminates the process.
    pub exit_on_fatal: bool,
    /// Directory for dump-on-fatal artifacts (`None` = XDG state dir).
    pub dump_dir: Option<PathBuf>,
    /// Process exit status used by the exit policy.
    pub exit_code: i32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            timestamps: true,
            exit_on_fatal: false,
            dump_dir: None,
            exit_code: 1,
        }
    }
}

impl RegistryConfig {
    /// Loads settings from a JSON file.
    ///
    /// A missing file yields the defaults; fields absent from the file keep
    /// their default values.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the JSON settings file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `RegistryConfig` or a `ConfigError`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, is malformed, or
    /// holds an invalid exit code.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No registry config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        debug!("Loading registry config from {:?}", path);
        let contents = read_to_string(path)?;
        let config: Self = from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Directory the exit policy writes dumps into.
    ///
    /// # Returns
    ///
    /// The configured `dump_dir`, or [`get_dump_dir`] when unset.
    #[must_use]
    pub fn resolved_dump_dir(&self) -> PathBuf {
        self.dump_dir.clone().unwrap_or_else(get_dump_dir)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.exit_code == 0 {
            return Err(ConfigError::InvalidValue {
                reason: "exit_code must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Gets the default directory for dump-on-fatal artifacts.
///
/// # Returns
///
/// `$XDG_STATE_HOME/blunders`, or `$HOME/.local/state/blunders`.
#[must_use]
pub fn get_dump_dir() -> PathBuf {
    let mut dump_dir = get_xdg_state_home();
    dump_dir.push("blunders");
    dump_dir
}

/// Gets the XDG state home directory following XDG Base Directory specification.
///
/// Uses `XDG_STATE_HOME` environment variable if set, otherwise defaults to $HOME/.local/state
fn get_xdg_state_home() -> PathBuf {
    if let Ok(state_home) = var("XDG_STATE_HOME")
        && !state_home.is_empty()
    {
        return PathBuf::from(state_home);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".local");
        path.push("state");
        return path;
    }

    // Fallback to current directory if HOME is not set (shouldn't happen on Unix)
    PathBuf::from(".")
}
