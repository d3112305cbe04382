//! Shell-specific error types.
//!
//! - [`ShellError`] ends the interactive session.
//! - [`CommandError`] is reported to the user for one command segment.
//! - [`OpenError`] is logged when a file cannot be handed to its default
//!   application.

use std::process::ExitStatus;

use camino::Utf8PathBuf;
use fleet_scanner::ScanError;
use thiserror::Error;

/// Errors that end the interactive session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShellError {
    /// Reading input or writing output failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The scanner could not be set up.
    #[error("scanner error: {0}")]
    Scan(#[from] ScanError),
}

/// Invalid user input for one command segment.
///
/// These never end the session; the message is printed and the remaining
/// segments of the line are still processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The first token is not a known command.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// A file command was given no file names.
    #[error("{0}: please provide at least one file name")]
    MissingArguments(&'static str),
}

/// Failure to open a file with the host's default application.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The host platform has no known default-application launcher.
    #[error("opening files with the default application is not supported on this platform")]
    Unsupported,

    /// The launcher process could not be started.
    #[error("failed to launch opener for {path}: {source}")]
    Launch {
        /// The file that was being opened.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The launcher exited unsuccessfully.
    #[error("opener for {path} exited with {status}")]
    Status {
        /// The file that was being opened.
        path: Utf8PathBuf,
        /// The launcher's exit status.
        status: ExitStatus,
    },
}

impl OpenError {
    /// Creates a new [`OpenError::Launch`] error.
    #[inline]
    pub fn launch(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Launch {
            path: path.into(),
            source,
        }
    }
}
