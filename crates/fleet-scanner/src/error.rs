//! Error types for the fleet-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! while listing a directory and counting words in its entries.

use camino::Utf8PathBuf;
use fleet_core::ConfigError;

/// Errors that can occur during scanning operations.
///
/// # Error Recovery Strategy
///
/// - **Listing errors** ([`ScanError::Walk`]): Fatal - the directory cannot be
///   enumerated, so there is no file set to work on
/// - **File read errors** ([`ScanError::Read`]): Log warning, count the entry
///   as an empty partial, continue
/// - **Worker failures** ([`ScanError::Worker`]): Same as read errors
///
/// # Examples
///
/// ```
/// use fleet_scanner::ScanError;
///
/// fn handle_error(err: &ScanError) {
///     match err {
///         ScanError::Walk(e) => eprintln!("Listing error: {e}"),
///         ScanError::Read { path, .. } => eprintln!("Read error: {path}"),
///         ScanError::Worker { path, .. } => eprintln!("Worker error: {path}"),
///         ScanError::Config(e) => eprintln!("Config error: {e}"),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Failed to enumerate the directory.
    #[error("failed to list directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to open or read a file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A counting task ended without producing a result.
    #[error("counting task for {path} failed: {message}")]
    Worker {
        /// The path the task was counting.
        path: Utf8PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// Invalid scanner configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ScanError {
    /// Creates a new [`ScanError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Worker`] error.
    #[inline]
    pub fn worker(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::Worker {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error only affects a single entry.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Worker { .. })
    }

    /// Returns `true` if this error prevents the scan from proceeding.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. } | Self::Worker { path, .. } => Some(path),
            Self::Walk(_) | Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_scan_error_read() {
        let err = ScanError::read("a.txt", io::Error::new(io::ErrorKind::NotFound, "not found"));
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
        assert_eq!(err.path().map(|p| p.as_str()), Some("a.txt"));
        assert!(err.to_string().contains("a.txt"));
    }

    #[test]
    fn test_scan_error_worker() {
        let err = ScanError::worker("b.txt", "task panicked");
        assert!(err.is_recoverable());
        assert_eq!(err.path().map(|p| p.as_str()), Some("b.txt"));
        assert!(err.to_string().contains("task panicked"));
    }

    #[test]
    fn test_scan_error_config() {
        let err = ScanError::from(ConfigError::invalid_option(
            "queue_capacity",
            "must be at least 1",
        ));
        assert!(err.is_fatal());
        assert!(err.path().is_none());
        assert!(err.to_string().starts_with("invalid configuration:"));
    }
}
