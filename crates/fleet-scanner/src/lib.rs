//! Directory listing and concurrent word aggregation.
//!
//! This crate takes a snapshot of the entries of one directory and counts
//! the words in every entry concurrently, merging the per-file counts into
//! distinct and total word statistics.
//!
//! # Overview
//!
//! The main entry point is [`Scanner`], which combines:
//!
//! - [`DirectoryLister`]: Non-recursive enumeration using the `ignore` walker
//! - [`count_words`]: Buffered, whitespace-delimited word counting
//! - [`Aggregator`]: One task per file, a bounded completion queue, and a
//!   single collector that owns the global tally
//!
//! # Example
//!
//! ```no_run
//! use fleet_core::Config;
//! use fleet_scanner::Scanner;
//!
//! # async fn example() -> Result<(), fleet_scanner::ScanError> {
//! let scanner = Scanner::new(&Config::default())?;
//! let report = scanner.scan(5).await?;
//!
//! println!("{}", report.result);
//! for word in &report.top_words {
//!     println!("{:>8}  {}", word.count, word.word);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Scanner (main entry point)
//!     │
//!     ├── DirectoryLister (snapshot of entries)
//!     │       │
//!     │       └── WalkBuilder (ignore crate, depth 1)
//!     │
//!     └── Aggregator (fan-out/fan-in)
//!             │
//!             ├── Semaphore (open-file limit)
//!             ├── spawn_blocking(count_words) per entry
//!             └── mpsc::channel (bounded completion queue)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod aggregator;
mod counter;
mod error;
mod lister;

pub use aggregator::Aggregator;
pub use counter::{count_reader, count_words, try_count_path, try_count_words};
pub use error::ScanError;
pub use lister::{DirectoryLister, list_directory};

use camino::Utf8Path;
use fleet_core::{AggregationResult, Config, FileDescriptor, WordTally};
use serde::Serialize;
use tracing::debug;

/// A word and the number of times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    /// The word.
    pub word: String,
    /// Number of occurrences across all files.
    pub count: u64,
}

/// Outcome of a full scan: statistics plus the most frequent words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Aggregated statistics.
    #[serde(flatten)]
    pub result: AggregationResult,
    /// The most frequent words, most frequent first.
    pub top_words: Vec<WordCount>,
}

impl ScanReport {
    /// Builds a report from a merged tally.
    #[must_use]
    pub fn from_tally(tally: &WordTally, result: AggregationResult, top_n: usize) -> Self {
        let top_words = tally
            .top(top_n)
            .into_iter()
            .map(|(word, count)| WordCount {
                word: word.to_owned(),
                count,
            })
            .collect();
        Self { result, top_words }
    }
}

/// Lists a directory and aggregates word counts over its entries.
#[derive(Debug, Clone)]
pub struct Scanner {
    lister: DirectoryLister,
    aggregator: Aggregator,
}

impl Scanner {
    /// Creates a scanner for the root and limits in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the aggregation limits are invalid.
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        Ok(Self {
            lister: DirectoryLister::new(&config.root),
            aggregator: Aggregator::new(&config.root, config.aggregate)?,
        })
    }

    /// Takes a fresh snapshot of the directory entries.
    ///
    /// # Errors
    ///
    /// See [`DirectoryLister::list`].
    pub fn list(&self) -> Result<Vec<FileDescriptor>, ScanError> {
        self.lister.list()
    }

    /// Aggregates word statistics over an existing snapshot.
    pub async fn aggregate(&self, files: &[FileDescriptor]) -> AggregationResult {
        self.aggregator.aggregate(files).await
    }

    /// Lists the directory, aggregates over every entry, and reports the
    /// `top_n` most frequent words.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory cannot be listed. Unreadable
    /// entries are counted in [`AggregationResult::unreadable`].
    pub async fn scan(&self, top_n: usize) -> Result<ScanReport, ScanError> {
        let files = self.list()?;
        debug!(root = %self.root(), files = files.len(), "Scanning");

        let (tally, result) = self.aggregator.aggregate_tally(&files).await;
        Ok(ScanReport::from_tally(&tally, result, top_n))
    }

    /// Returns the directory being scanned.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        self.lister.root()
    }
}
