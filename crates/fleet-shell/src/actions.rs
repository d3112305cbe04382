//! Background file actions.
//!
//! Each action runs as its own blocking task and returns its
//! [`JoinHandle`]. The interactive loop drops the handles, so actions are
//! fire-and-forget: failures are logged and never reach the user prompt.
//! Two actions on the same file, such as `create foo; delete foo`, may
//! complete in either order.

use std::fs::{self, File};
use std::io::{self, Write};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use fleet_scanner::list_directory;
use tokio::task::{self, JoinHandle};
use tracing::{debug, warn};

use crate::SharedOutput;
use crate::opener::DefaultOpener;
use crate::table;

/// Creates `path` as an empty file, truncating any existing contents.
pub fn spawn_create(path: Utf8PathBuf) -> JoinHandle<()> {
    task::spawn_blocking(move || match create_file(&path) {
        Ok(()) => debug!(path = %path, "Created file"),
        Err(error) => warn!(path = %path, error = %error, "Failed to create file"),
    })
}

/// Removes the file at `path`.
pub fn spawn_delete(path: Utf8PathBuf) -> JoinHandle<()> {
    task::spawn_blocking(move || match fs::remove_file(&path) {
        Ok(()) => debug!(path = %path, "Deleted file"),
        Err(error) => warn!(path = %path, error = %error, "Failed to delete file"),
    })
}

/// Creates `path` if it is absent, then opens it with `opener`.
pub fn spawn_open(path: Utf8PathBuf, opener: Arc<dyn DefaultOpener>) -> JoinHandle<()> {
    task::spawn_blocking(move || {
        if let Err(error) = ensure_exists(&path) {
            warn!(path = %path, error = %error, "Failed to open file");
            return;
        }
        match opener.open(&path) {
            Ok(()) => debug!(path = %path, "Opened file"),
            Err(error) => warn!(path = %path, error = %error, "Failed to open file"),
        }
    })
}

/// Lists `root` and writes the table to `output` in one piece.
pub fn spawn_list(root: Utf8PathBuf, output: SharedOutput) -> JoinHandle<()> {
    task::spawn_blocking(move || {
        let mut rendered = Vec::new();
        match list_directory(&root) {
            Ok(files) => {
                if let Err(error) = table::render(&files, &mut rendered) {
                    warn!(error = %error, "Failed to render listing");
                    return;
                }
            }
            Err(error) => {
                warn!(root = %root, error = %error, "Failed to list directory");
                rendered = format!("list: {error}\n").into_bytes();
            }
        }

        let mut out = output.lock();
        if let Err(error) = out.write_all(&rendered).and_then(|()| out.flush()) {
            warn!(error = %error, "Failed to write listing");
        }
    })
}

fn create_file(path: &Utf8Path) -> io::Result<()> {
    File::create(path.as_std_path()).map(drop)
}

/// Creates an empty file only if nothing exists at `path`.
fn ensure_exists(path: &Utf8Path) -> io::Result<()> {
    match fs::symlink_metadata(path.as_std_path()) {
        Ok(_) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => create_file(path),
        Err(error) => Err(error),
    }
}
