//! Per-file word counting.
//!
//! A word is a maximal run of bytes that are not ASCII whitespace (space,
//! tab, newline, carriage return, form feed). Words are case-sensitive and
//! punctuation is kept. Input is read in buffered chunks, so a word split
//! across two chunks is still counted once.
//!
//! Bytes that are not valid UTF-8 are decoded lossily per word instead of
//! failing the whole file.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use fleet_core::WordTally;
use tracing::{trace, warn};

use crate::error::ScanError;

/// Counts the words in the file at `path`.
///
/// Never fails: if the file cannot be opened or read, a warning is logged
/// and an empty tally is returned. Directories and permission-denied files
/// therefore contribute nothing.
pub fn count_words(path: &Utf8Path) -> WordTally {
    match try_count_words(path) {
        Ok(tally) => tally,
        Err(error) => {
            warn!(path = %path, error = %error, "Error reading file, counting it as empty");
            WordTally::new()
        }
    }
}

/// Counts the words in the file at `path`, reporting read failures.
///
/// The file handle is dropped before this function returns, on the success
/// path and on every error path.
///
/// # Errors
///
/// Returns [`ScanError::Read`] if the file cannot be opened or read.
pub fn try_count_words(path: &Utf8Path) -> Result<WordTally, ScanError> {
    try_count_path(path.as_std_path())
}

/// Like [`try_count_words`], for paths that may not be valid UTF-8.
///
/// Errors carry the lossily converted path.
///
/// # Errors
///
/// Returns [`ScanError::Read`] if the file cannot be opened or read.
pub fn try_count_path(path: &Path) -> Result<WordTally, ScanError> {
    let display = || Utf8PathBuf::from(path.to_string_lossy().into_owned());
    let file = File::open(path).map_err(|e| ScanError::read(display(), e))?;
    let tally = count_reader(BufReader::new(file)).map_err(|e| ScanError::read(display(), e))?;

    trace!(path = %path.display(), distinct = tally.distinct(), "Counted file");
    Ok(tally)
}

/// Counts the words produced by `reader`.
///
/// # Errors
///
/// Returns any I/O error other than [`io::ErrorKind::Interrupted`], which is
/// retried.
pub fn count_reader<R: BufRead>(mut reader: R) -> io::Result<WordTally> {
    let mut tally = WordTally::new();
    let mut word: Vec<u8> = Vec::new();

    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if chunk.is_empty() {
            break;
        }

        for &byte in chunk {
            if byte.is_ascii_whitespace() {
                flush_word(&mut tally, &mut word);
            } else {
                word.push(byte);
            }
        }

        let len = chunk.len();
        reader.consume(len);
    }

    flush_word(&mut tally, &mut word);
    Ok(tally)
}

/// Records the pending word, if any, and clears the buffer.
fn flush_word(tally: &mut WordTally, word: &mut Vec<u8>) {
    if word.is_empty() {
        return;
    }
    match std::str::from_utf8(word.as_slice()) {
        Ok(text) => tally.record(text),
        Err(_) => tally.record(&String::from_utf8_lossy(word.as_slice())),
    }
    word.clear();
}
