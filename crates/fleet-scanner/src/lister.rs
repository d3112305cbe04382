//! Directory enumeration.
//!
//! This module provides [`DirectoryLister`], which takes a snapshot of the
//! direct entries of one directory. It uses the `ignore` crate's walker
//! limited to depth 1 with every filter disabled, so hidden files and
//! gitignored files are listed like any other entry.
//!
//! Subdirectories are listed too and are not distinguished from files. The
//! word counter fails gracefully when asked to read one.
//!
//! # Examples
//!
//! ```no_run
//! use fleet_scanner::list_directory;
//! use camino::Utf8Path;
//!
//! let files = list_directory(Utf8Path::new("."))?;
//! for file in &files {
//!     println!("{} ({} bytes)", file.name, file.size);
//! }
//! # Ok::<(), fleet_scanner::ScanError>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use fleet_core::{ConfigError, FileDescriptor};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::error::ScanError;

/// Takes snapshots of the direct entries of a directory.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    /// The directory to enumerate.
    root: Utf8PathBuf,
}

impl DirectoryLister {
    /// Creates a lister for the given directory.
    ///
    /// The directory is not checked until [`list()`](Self::list) is called,
    /// since it may be created or removed in between.
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_owned(),
        }
    }

    /// Enumerates the direct entries of the directory.
    ///
    /// Entries are returned sorted by name. An entry whose metadata cannot be
    /// read (for example because it was removed while listing) is skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root is missing or is not a
    /// directory, and [`ScanError::Walk`] if it cannot be read.
    pub fn list(&self) -> Result<Vec<FileDescriptor>, ScanError> {
        if !self.root.exists() {
            return Err(ConfigError::MissingDirectory(self.root.clone()).into());
        }
        if !self.root.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: self.root.clone(),
                reason: "not a directory".to_owned(),
            }
            .into());
        }

        let mut files = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            // Depth 0 is the root itself
            if entry.depth() == 0 {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    files.push(FileDescriptor::from_os_name(
                        entry.file_name(),
                        metadata.len(),
                        metadata.modified().ok(),
                    ));
                }
                Err(error) => {
                    let name = entry.file_name().to_string_lossy();
                    warn!(name = %name, error = %error, "Skipping entry without metadata");
                }
            }
        }

        debug!(root = %self.root, count = files.len(), "Listed directory");
        Ok(files)
    }

    /// Builds a non-recursive walker with every filter disabled.
    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            .standard_filters(false)
            .max_depth(Some(1))
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
    }

    /// Returns the directory being listed.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Enumerates the direct entries of `root`.
///
/// Shorthand for `DirectoryLister::new(root).list()`.
///
/// # Errors
///
/// See [`DirectoryLister::list`].
pub fn list_directory(root: &Utf8Path) -> Result<Vec<FileDescriptor>, ScanError> {
    DirectoryLister::new(root).list()
}
