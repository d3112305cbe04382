//! Concurrent fan-out/fan-in word aggregation.
//!
//! [`Aggregator`] launches one task per directory entry, collects exactly one
//! partial tally from each, and merges them into a global tally owned by the
//! collecting call frame.
//!
//! # Design
//!
//! ```text
//!  aggregate()                       one task per entry
//!  ───────────                       ──────────────────
//!  spawn N tasks ──────────────────► acquire open permit (Semaphore)
//!                                    spawn_blocking(try_count_path)
//!                                    release permit
//!  recv() x N  ◄──── bounded mpsc ── send(Partial)
//!  merge into local WordTally
//!  summarize
//! ```
//!
//! - The semaphore bounds how many files are open at once.
//! - The bounded channel bounds how many finished partials wait to be
//!   merged. A worker blocked on a full channel holds no file handle, since
//!   its permit was released when counting finished.
//! - Workers never touch the global tally. Only the collector mutates it, so
//!   the tally needs no lock.
//! - Every task sends exactly one partial, including on read failure or
//!   worker panic, so the collector always receives N messages.

use std::path::PathBuf;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use fleet_core::{AggregateConfig, AggregationResult, FileDescriptor, WordTally};
use tokio::sync::{Semaphore, mpsc};
use tokio::task;
use tracing::{debug, info, warn};

use crate::counter::try_count_path;
use crate::error::ScanError;

/// The result produced by one counting task.
#[derive(Debug)]
struct Partial {
    /// Word counts for the entry; empty when unreadable.
    tally: WordTally,
    /// Whether the entry could not be read.
    unreadable: bool,
}

impl Partial {
    const fn counted(tally: WordTally) -> Self {
        Self {
            tally,
            unreadable: false,
        }
    }

    fn unreadable() -> Self {
        Self {
            tally: WordTally::new(),
            unreadable: true,
        }
    }
}

/// Fan-out/fan-in word aggregator for the entries of one directory.
///
/// # Examples
///
/// ```no_run
/// use fleet_core::AggregateConfig;
/// use fleet_scanner::{Aggregator, list_directory};
/// use camino::Utf8Path;
///
/// # async fn example() -> Result<(), fleet_scanner::ScanError> {
/// let root = Utf8Path::new(".");
/// let files = list_directory(root)?;
///
/// let aggregator = Aggregator::new(root, AggregateConfig::default())?;
/// let result = aggregator.aggregate(&files).await;
/// println!("{} different words, {} total", result.distinct_words, result.total_words);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Aggregator {
    /// Directory the descriptors' names are relative to.
    root: Utf8PathBuf,
    /// Queue and open-file limits.
    config: AggregateConfig,
}

impl Aggregator {
    /// Creates an aggregator for entries of `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if either limit in `config` is zero.
    pub fn new(root: &Utf8Path, config: AggregateConfig) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self {
            root: root.to_owned(),
            config,
        })
    }

    /// Counts the words of every entry concurrently and returns the merged
    /// statistics.
    ///
    /// Returns only after one partial per entry has been collected. Entries
    /// that cannot be read count as empty and are reported in
    /// [`AggregationResult::unreadable`].
    ///
    /// Must be called from within a tokio runtime.
    pub async fn aggregate(&self, files: &[FileDescriptor]) -> AggregationResult {
        let (_, result) = self.aggregate_tally(files).await;
        result
    }

    /// Like [`aggregate()`](Self::aggregate), but also returns the merged
    /// global tally.
    ///
    /// The tally belongs to the caller; nothing is retained by the
    /// aggregator.
    pub async fn aggregate_tally(
        &self,
        files: &[FileDescriptor],
    ) -> (WordTally, AggregationResult) {
        if files.is_empty() {
            debug!(root = %self.root, "No entries to aggregate");
            return (WordTally::new(), AggregationResult::default());
        }

        info!(
            root = %self.root,
            files = files.len(),
            queue_capacity = self.config.queue_capacity,
            max_open_files = self.config.max_open_files,
            "Starting aggregation"
        );

        let (tx, mut rx) = mpsc::channel::<Partial>(self.config.queue_capacity);
        let permits = Arc::new(Semaphore::new(self.config.max_open_files));

        for file in files {
            let tx = tx.clone();
            let permits = Arc::clone(&permits);
            // The exact on-disk name, which may not be UTF-8
            let path = self.root.as_std_path().join(file.file_name());

            task::spawn(async move {
                let partial = count_entry(path, permits).await;
                // Fails only if the collector was dropped mid-run
                let _ = tx.send(partial).await;
            });
        }
        // Collector must not hold a sender, or recv() would never see the
        // channel close if a task vanished.
        drop(tx);

        let expected = files.len() as u64;
        let mut global = WordTally::new();
        let mut received: u64 = 0;
        let mut unreadable: u64 = 0;

        while received < expected {
            let Some(partial) = rx.recv().await else {
                break;
            };
            received += 1;
            if partial.unreadable {
                unreadable += 1;
            }
            global.merge(partial.tally);
        }

        if received < expected {
            let missing = expected - received;
            warn!(expected, received, missing, "Some counting tasks never reported");
            unreadable += missing;
        }

        let result = global.summarize(expected, unreadable);
        info!(
            distinct = result.distinct_words,
            total = result.total_words,
            unreadable = result.unreadable,
            "Aggregation completed"
        );

        (global, result)
    }

    /// Returns the aggregation limits.
    #[must_use]
    pub const fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// Returns the directory entries are resolved against.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Counts one entry while holding an open-file permit.
///
/// The permit is released when this function returns, before the caller
/// submits the partial to the completion queue.
async fn count_entry(path: PathBuf, permits: Arc<Semaphore>) -> Partial {
    // The semaphore is never closed, so acquiring cannot fail in practice
    let Ok(_permit) = permits.acquire_owned().await else {
        warn!(path = %path.display(), "Open-file semaphore closed");
        return Partial::unreadable();
    };

    let task_path = path.clone();
    let outcome = task::spawn_blocking(move || try_count_path(&task_path))
        .await
        .unwrap_or_else(|join_error| {
            let display = Utf8PathBuf::from(path.to_string_lossy().into_owned());
            Err(ScanError::worker(display, join_error.to_string()))
        });

    match outcome {
        Ok(tally) => Partial::counted(tally),
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "Error reading file, counting it as empty"
            );
            Partial::unreadable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::lister::list_directory;

    fn utf8_root(dir: &TempDir) -> &Utf8Path {
        Utf8Path::from_path(dir.path()).expect("Invalid path")
    }

    fn write_files(dir: &TempDir, files: &[(&str, &str)]) {
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).expect("write failed");
        }
    }

    async fn aggregate_dir(dir: &TempDir, config: AggregateConfig) -> AggregationResult {
        let root = utf8_root(dir);
        let files = list_directory(root).expect("listing failed");
        Aggregator::new(root, config)
            .expect("valid config")
            .aggregate(&files)
            .await
    }

    #[tokio::test]
    async fn test_two_file_scenario() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        write_files(&dir, &[("a.txt", "the cat sat"), ("b.txt", "the dog sat down")]);

        let result = aggregate_dir(&dir, AggregateConfig::default()).await;

        assert_eq!(result.distinct_words, 5);
        assert_eq!(result.total_words, 7);
        assert_eq!(result.files, 2);
        assert_eq!(result.unreadable, 0);
    }

    #[tokio::test]
    async fn test_empty_directory_returns_zero() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let result = aggregate_dir(&dir, AggregateConfig::default()).await;
        assert_eq!(result, AggregationResult::default());
    }

    #[tokio::test]
    async fn test_empty_file_list_needs_no_runtime_tasks() {
        let aggregator =
            Aggregator::new(Utf8Path::new("."), AggregateConfig::default()).expect("valid config");
        let (tally, result) = aggregator.aggregate_tally(&[]).await;
        assert!(tally.is_empty());
        assert_eq!(result.files, 0);
    }

    #[tokio::test]
    async fn test_global_tally_matches_sum_of_partials() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        write_files(
            &dir,
            &[
                ("one.txt", "alpha beta beta"),
                ("two.txt", "beta Gamma\tgamma\n"),
                ("three.txt", ""),
            ],
        );

        let root = utf8_root(&dir);
        let files = list_directory(root).expect("listing failed");
        let aggregator = Aggregator::new(root, AggregateConfig::default()).expect("valid config");
        let (tally, result) = aggregator.aggregate_tally(&files).await;

        assert_eq!(tally.get("alpha"), 1);
        assert_eq!(tally.get("beta"), 3);
        assert_eq!(tally.get("Gamma"), 1);
        assert_eq!(tally.get("gamma"), 1);
        assert_eq!(result.distinct_words, 4);
        assert_eq!(result.total_words, 6);
        assert_eq!(result.files, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_repeated_runs_are_order_independent() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        for i in 0..40 {
            let contents = format!("shared word{i} {}", "x ".repeat(i));
            fs::write(dir.path().join(format!("f{i}.txt")), contents).expect("write failed");
        }

        let first = aggregate_dir(&dir, AggregateConfig::default()).await;
        // 40 files: "shared" x40, word0..word39, and x repeated 0+1+..+39 = 780
        assert_eq!(first.distinct_words, 42);
        assert_eq!(first.total_words, 40 + 40 + 780);

        for _ in 0..10 {
            let again = aggregate_dir(&dir, AggregateConfig::default()).await;
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn test_unreadable_entry_does_not_lose_other_results() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        write_files(&dir, &[("a.txt", "the cat sat"), ("b.txt", "the dog sat down")]);
        fs::create_dir(dir.path().join("subdir")).expect("mkdir failed");

        let result = aggregate_dir(&dir, AggregateConfig::default()).await;

        assert_eq!(result.files, 3);
        assert_eq!(result.unreadable, 1);
        assert_eq!(result.readable(), 2);
        assert_eq!(result.distinct_words, 5);
        assert_eq!(result.total_words, 7);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_permission_denied_counts_as_empty() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("Failed to create temp directory");
        write_files(&dir, &[("open.txt", "one two"), ("locked.txt", "three four five")]);
        let locked = dir.path().join("locked.txt");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod failed");

        // Root can read anything; only assert the denial when it applies
        let denied = fs::File::open(&locked).is_err();
        let result = aggregate_dir(&dir, AggregateConfig::default()).await;

        assert_eq!(result.files, 2);
        if denied {
            assert_eq!(result.unreadable, 1);
            assert_eq!(result.total_words, 2);
        } else {
            assert_eq!(result.total_words, 5);
        }
    }

    #[tokio::test]
    async fn test_descriptor_for_vanished_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        write_files(&dir, &[("kept.txt", "still here")]);
        let files = vec![
            FileDescriptor::new("kept.txt", 10, None),
            FileDescriptor::new("gone.txt", 10, None),
        ];

        let aggregator =
            Aggregator::new(utf8_root(&dir), AggregateConfig::default()).expect("valid config");
        let result = aggregator.aggregate(&files).await;

        assert_eq!(result.files, 2);
        assert_eq!(result.unreadable, 1);
        assert_eq!(result.total_words, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_many_more_files_than_queue_and_permits() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        for i in 0..300 {
            fs::write(dir.path().join(format!("{i:03}.txt")), format!("common unique{i}"))
                .expect("write failed");
        }

        let config = AggregateConfig {
            queue_capacity: 2,
            max_open_files: 3,
        };
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            aggregate_dir(&dir, config),
        )
        .await
        .expect("aggregation should not deadlock");

        assert_eq!(result.files, 300);
        assert_eq!(result.unreadable, 0);
        assert_eq!(result.total_words, 600);
        // "common" in every file plus one unique word per file
        assert_eq!(result.distinct_words, 301);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_file_name_is_counted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().expect("Failed to create temp directory");
        let raw = OsStr::from_bytes(b"bad\xffname.txt");
        fs::write(dir.path().join(raw), "alpha beta gamma").expect("write failed");
        write_files(&dir, &[("plain.txt", "alpha")]);

        let result = aggregate_dir(&dir, AggregateConfig::default()).await;

        assert_eq!(result.files, 2);
        assert_eq!(result.unreadable, 0);
        assert_eq!(result.total_words, 4);
        assert_eq!(result.distinct_words, 3);
    }

    #[test]
    fn test_new_rejects_zero_limits() {
        let config = AggregateConfig {
            queue_capacity: 0,
            max_open_files: 1,
        };
        let result = Aggregator::new(Utf8Path::new("."), config);
        assert!(matches!(result, Err(ScanError::Config(_))));
    }

    #[test]
    fn test_accessors() {
        let aggregator =
            Aggregator::new(Utf8Path::new("some/dir"), AggregateConfig::default())
                .expect("valid config");
        assert_eq!(aggregator.root().as_str(), "some/dir");
        assert_eq!(aggregator.config().queue_capacity, 200);
    }
}
