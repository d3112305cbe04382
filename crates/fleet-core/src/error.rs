//! Error types for the fleet-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration
//! validation failures.

use camino::Utf8PathBuf;

/// Errors that can occur while validating configuration.
///
/// # Examples
///
/// ```
/// use fleet_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/some/path"));
/// assert!(error.to_string().contains("/some/path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configured root exists but is not a directory.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// The configured root directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_display() {
        let error = ConfigError::InvalidPath {
            path: Utf8PathBuf::from("notes.txt"),
            reason: "not a directory".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains("notes.txt"));
        assert!(msg.contains("not a directory"));
    }

    #[test]
    fn test_missing_directory_display() {
        let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/missing/dir"));
        assert!(error.to_string().contains("/missing/dir"));
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("queue_capacity", "must be at least 1");
        let msg = error.to_string();
        assert!(msg.contains("queue_capacity"));
        assert!(msg.contains("must be at least 1"));
    }
}
