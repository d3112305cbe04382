//! Interactive file-management shell.
//!
//! The shell reads one line at a time, splits it on `;`, and dispatches each
//! command in order. File commands (`create`, `open`, `delete`) and `list`
//! run as detached background tasks; `count` and `help` answer in the
//! foreground.
//!
//! # Architecture
//!
//! ```text
//! crates/fleet-shell/src/
//!   lib.rs       # Public API exports, shared output handle
//!   shell.rs     # Read-eval loop and dispatch
//!   command.rs   # Line splitting and command parsing
//!   actions.rs   # Background create/open/delete/list tasks
//!   opener.rs    # DefaultOpener capability and platform launcher
//!   table.rs     # Bordered listing table
//!   error.rs     # ShellError, CommandError, OpenError
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fleet_core::Config;
//! use fleet_shell::Shell;
//! use parking_lot::Mutex;
//! use tokio::io::BufReader;
//!
//! # async fn example() -> Result<(), fleet_shell::ShellError> {
//! let output = Arc::new(Mutex::new(std::io::stdout()));
//! let shell = Shell::new(&Config::default(), output)?;
//! shell.run(BufReader::new(tokio::io::stdin())).await
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod actions;
pub mod command;
pub mod error;
pub mod opener;
pub mod shell;
pub mod table;

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

pub use command::{Command, parse_line};
pub use error::{CommandError, OpenError, ShellError};
pub use opener::{DefaultOpener, SystemOpener};
pub use shell::{Dispatch, Flow, Shell};

/// Output shared by the prompt loop and background actions.
///
/// Each writer holds the lock for one complete message, so a listing never
/// interleaves with a prompt.
pub type SharedOutput = Arc<Mutex<dyn Write + Send>>;
