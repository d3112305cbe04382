//! Opening files with the host's default application.
//!
//! [`DefaultOpener`] is the capability the shell's `open` command depends
//! on. [`SystemOpener`] launches the platform's launcher:
//!
//! | Platform     | Launcher              |
//! |--------------|-----------------------|
//! | Windows      | `cmd /C start "" FILE` |
//! | macOS        | `open FILE`           |
//! | Other Unix   | `xdg-open FILE`       |
//!
//! Anywhere else [`OpenError::Unsupported`] is returned.

use std::process::{Command, Stdio};
use std::thread;

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::error::OpenError;

/// Hands a file to the application the host associates with it.
pub trait DefaultOpener: Send + Sync {
    /// Opens `path` with its default application.
    ///
    /// # Errors
    ///
    /// Returns an [`OpenError`] if no launcher exists or it fails.
    fn open(&self, path: &Utf8Path) -> Result<(), OpenError>;
}

/// Opens files through the platform's launcher process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl DefaultOpener for SystemOpener {
    fn open(&self, path: &Utf8Path) -> Result<(), OpenError> {
        start(launcher(path)?, path)
    }
}

/// Starts `cmd` without waiting for it to finish.
///
/// Some launchers block until the application closes, so the child is
/// reaped on a detached thread and a failing exit status is only logged.
fn start(mut cmd: Command, path: &Utf8Path) -> Result<(), OpenError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| OpenError::launch(path, source))?;

    let path = path.to_owned();
    let reaper = thread::Builder::new()
        .name("opener-reaper".to_owned())
        .spawn(move || match child.wait() {
            Ok(status) if status.success() => debug!(path = %path, "Launcher exited"),
            Ok(status) => {
                let error = OpenError::Status { path, status };
                warn!(error = %error, "Launcher failed");
            }
            Err(source) => {
                let error = OpenError::launch(&path, source);
                warn!(error = %error, "Failed to wait for launcher");
            }
        });
    if let Err(error) = reaper {
        warn!(error = %error, "Failed to start launcher reaper");
    }
    Ok(())
}

/// Creates a command for an external program, rooted at the file's parent
/// directory.
#[allow(clippy::disallowed_methods)]
fn command(program: &str, path: &Utf8Path) -> Command {
    let mut cmd = Command::new(program);
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        cmd.current_dir(parent.as_std_path());
    }
    cmd
}

#[cfg(windows)]
fn launcher(path: &Utf8Path) -> Result<Command, OpenError> {
    let mut cmd = command("cmd", path);
    // The empty argument is the window title, so quoted names stay file names
    cmd.args(["/C", "start", ""]).arg(path.as_std_path());
    Ok(cmd)
}

#[cfg(target_os = "macos")]
fn launcher(path: &Utf8Path) -> Result<Command, OpenError> {
    let mut cmd = command("open", path);
    cmd.arg(path.as_std_path());
    Ok(cmd)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn launcher(path: &Utf8Path) -> Result<Command, OpenError> {
    let mut cmd = command("xdg-open", path);
    cmd.arg(path.as_std_path());
    Ok(cmd)
}

#[cfg(not(any(windows, unix)))]
fn launcher(_path: &Utf8Path) -> Result<Command, OpenError> {
    Err(OpenError::Unsupported)
}
