//! Directory entry snapshots.

use std::ffi::{OsStr, OsString};
use std::time::SystemTime;

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

/// An immutable snapshot of one directory entry taken at enumeration time.
///
/// Descriptors are not refreshed. If the filesystem changes after the
/// snapshot was taken, the descriptor is simply stale.
///
/// # Examples
///
/// ```
/// use fleet_core::FileDescriptor;
///
/// let file = FileDescriptor::new("notes.txt", 42, None);
/// assert_eq!(file.name, "notes.txt");
/// assert_eq!(file.modified_display(), "unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Entry name relative to the listed directory, for display.
    ///
    /// Lossily converted when the on-disk name is not valid UTF-8.
    pub name: String,

    /// Size in bytes as reported by the filesystem.
    pub size: u64,

    /// Last modification time, if the platform reports one.
    pub modified_at: Option<DateTime<Local>>,

    /// The exact on-disk name when it differs from `name`.
    #[serde(skip)]
    raw_name: Option<OsString>,
}

impl FileDescriptor {
    /// Creates a descriptor from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64, modified_at: Option<SystemTime>) -> Self {
        Self {
            name: name.into(),
            size,
            modified_at: modified_at.map(DateTime::<Local>::from),
            raw_name: None,
        }
    }

    /// Creates a descriptor from an on-disk name that may not be UTF-8.
    ///
    /// `name` holds the lossy form; the exact name is kept for
    /// [`file_name()`](Self::file_name).
    #[must_use]
    pub fn from_os_name(os_name: &OsStr, size: u64, modified_at: Option<SystemTime>) -> Self {
        match os_name.to_str() {
            Some(name) => Self::new(name, size, modified_at),
            None => Self {
                raw_name: Some(os_name.to_owned()),
                ..Self::new(os_name.to_string_lossy(), size, modified_at)
            },
        }
    }

    /// Returns the exact name to open the entry with.
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        self.raw_name
            .as_deref()
            .unwrap_or_else(|| OsStr::new(&self.name))
    }

    /// Returns the modification time as an RFC 3339 string in local time.
    ///
    /// Returns `"unknown"` when the platform did not report a timestamp.
    #[must_use]
    pub fn modified_display(&self) -> String {
        self.modified_at.map_or_else(
            || "unknown".to_owned(),
            |time| time.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }

    /// Returns `true` if both snapshots agree on name and size.
    ///
    /// Modification times are ignored; two listings of an untouched
    /// directory compare equal under this relation.
    #[inline]
    #[must_use]
    pub fn same_entry(&self, other: &Self) -> bool {
        self.name == other.name && self.size == other.size
    }
}
