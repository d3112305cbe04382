//! Word occurrence counts.
//!
//! A [`WordTally`] maps each word token to the number of times it was seen.
//! One tally is produced per file, and partial tallies are merged into a
//! single global tally by summing counts per key. Merging is commutative
//! and associative, so the order in which partials arrive never changes
//! the final result.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::hash::{FxHashMap, fx_hash_map, fx_hash_map_with_capacity};
use crate::types::AggregationResult;

/// Mapping from word to occurrence count.
///
/// Words are case-sensitive and stored exactly as tokenized; every stored
/// count is at least 1.
///
/// # Examples
///
/// ```
/// use fleet_core::WordTally;
///
/// let mut partial_a: WordTally = ["the", "cat", "sat"].into_iter().collect();
/// let partial_b: WordTally = ["the", "dog", "sat", "down"].into_iter().collect();
///
/// partial_a.merge(partial_b);
/// assert_eq!(partial_a.distinct(), 5);
/// assert_eq!(partial_a.total(), 7);
/// assert_eq!(partial_a.get("the"), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordTally {
    counts: FxHashMap<String, u64>,
}

impl WordTally {
    /// Creates an empty tally.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: fx_hash_map(),
        }
    }

    /// Creates an empty tally with room for `capacity` distinct words.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: fx_hash_map_with_capacity(capacity),
        }
    }

    /// Records one occurrence of `word`.
    ///
    /// Only allocates when the word has not been seen before.
    pub fn record(&mut self, word: &str) {
        if let Some(count) = self.counts.get_mut(word) {
            *count += 1;
        } else {
            self.counts.insert(word.to_owned(), 1);
        }
    }

    /// Adds `count` occurrences of `word`. A zero count is ignored.
    pub fn add(&mut self, word: impl Into<String>, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(word.into()).or_insert(0) += count;
    }

    /// Merges `other` into this tally by summing counts per word.
    ///
    /// The larger map is kept as the accumulator so merging a small partial
    /// into a large global tally never rehashes the large side.
    pub fn merge(&mut self, mut other: Self) {
        if other.counts.len() > self.counts.len() {
            std::mem::swap(&mut self.counts, &mut other.counts);
        }
        for (word, count) in other.counts {
            *self.counts.entry(word).or_insert(0) += count;
        }
    }

    /// Returns the number of occurrences of `word` (0 if never seen).
    #[must_use]
    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Returns the number of distinct words.
    #[inline]
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Returns the sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Returns `true` if no word has been recorded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(word, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(word, &count)| (word.as_str(), count))
    }

    /// Returns the `n` most frequent words, highest count first.
    ///
    /// Ties are broken by lexicographic word order so the output is stable.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_unstable_by_key(|&(word, count)| (Reverse(count), word));
        entries.truncate(n);
        entries
    }

    /// Summarizes this tally as an [`AggregationResult`].
    ///
    /// `files` and `unreadable` describe how many partials were merged to
    /// build the tally and how many of them came from unreadable entries.
    #[must_use]
    pub fn summarize(&self, files: u64, unreadable: u64) -> AggregationResult {
        AggregationResult {
            distinct_words: self.distinct() as u64,
            total_words: self.total(),
            files,
            unreadable,
        }
    }
}

impl<'a> FromIterator<&'a str> for WordTally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Self::new();
        tally.extend(iter);
        tally
    }
}

impl<'a> Extend<&'a str> for WordTally {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for word in iter {
            self.record(word);
        }
    }
}

impl IntoIterator for WordTally {
    type Item = (String, u64);
    type IntoIter = std::collections::hash_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}
