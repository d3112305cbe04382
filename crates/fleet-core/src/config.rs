//! Configuration structures for the fleet word scanner.
//!
//! - [`AggregateConfig`] - Fan-out/fan-in limits (completion queue, open files)
//! - [`ShellConfig`] - Interactive shell settings
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`]. The binary builds a
//! [`Config`] from command-line flags; there is no configuration file.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default capacity of the completion queue between workers and collector.
pub const DEFAULT_QUEUE_CAPACITY: usize = 200;

/// Default number of files that may be open for counting at the same time.
pub const DEFAULT_MAX_OPEN_FILES: usize = 64;

/// Default interactive prompt.
pub const DEFAULT_PROMPT: &str = "Enter command: ";

/// Limits for the word aggregation pipeline.
///
/// # Examples
///
/// ```
/// use fleet_core::AggregateConfig;
///
/// let config = AggregateConfig::default();
/// assert_eq!(config.queue_capacity, 200);
/// assert_eq!(config.max_open_files, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Capacity of the bounded channel that carries partial tallies.
    ///
    /// Workers wait when the queue is full.
    pub queue_capacity: usize,

    /// Maximum number of files opened for counting at the same time.
    pub max_open_files: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_open_files: DEFAULT_MAX_OPEN_FILES,
        }
    }
}

impl AggregateConfig {
    /// Checks that both limits are at least 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::invalid_option(
                "queue_capacity",
                "must be at least 1",
            ));
        }
        if self.max_open_files == 0 {
            return Err(ConfigError::invalid_option(
                "max_open_files",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Interactive shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt printed before each input line.
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_owned(),
        }
    }
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use fleet_core::Config;
///
/// let config = Config::default();
/// assert_eq!(config.root.as_str(), ".");
/// assert!(config.aggregate.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory whose entries are scanned and managed.
    pub root: Utf8PathBuf,

    /// Aggregation limits.
    pub aggregate: AggregateConfig,

    /// Shell settings.
    pub shell: ShellConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            aggregate: AggregateConfig::default(),
            shell: ShellConfig::default(),
        }
    }
}

impl Config {
    /// Validates the root directory and aggregation limits.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingDirectory`] if the root does not exist
    /// - [`ConfigError::InvalidPath`] if the root is not a directory
    /// - [`ConfigError::InvalidOption`] if a limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.exists() {
            return Err(ConfigError::MissingDirectory(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: self.root.clone(),
                reason: "not a directory".to_owned(),
            });
        }
        self.aggregate.validate()
    }
}
