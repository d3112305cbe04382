//! Aggregation statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary statistics of one aggregation run.
///
/// `distinct_words` and `total_words` are derived from the merged global
/// tally. `files` is the number of partial tallies that were collected and
/// `unreadable` how many of those came from entries that could not be read
/// (their contribution to the word counts is empty).
///
/// # Examples
///
/// ```
/// use fleet_core::AggregationResult;
///
/// let result = AggregationResult::default();
/// assert!(result.is_empty());
/// assert_eq!(result.readable(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Number of distinct words across all files.
    pub distinct_words: u64,
    /// Sum of all word occurrences across all files.
    pub total_words: u64,
    /// Number of partial tallies collected (one per scanned entry).
    pub files: u64,
    /// Number of entries that could not be opened or read.
    pub unreadable: u64,
}

impl AggregationResult {
    /// Returns `true` if no words were counted.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_words == 0
    }

    /// Returns the number of entries that were read successfully.
    #[inline]
    #[must_use]
    pub const fn readable(&self) -> u64 {
        self.files.saturating_sub(self.unreadable)
    }
}

impl fmt::Display for AggregationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} different words", self.distinct_words)?;
        write!(f, "{} total words", self.total_words)?;
        if self.unreadable > 0 {
            write!(f, "\n{} of {} entries could not be read", self.unreadable, self.files)?;
        }
        Ok(())
    }
}
