//! Command-line parsing.
//!
//! A line holds one or more commands separated by `;`. Each segment is
//! trimmed and split on whitespace; the first token selects the command and
//! is case-sensitive.
//!
//! ```text
//! create a.txt b.txt ; open a.txt ; list
//! └──── segment ────┘   └─ seg ─┘   └seg┘
//! ```

use crate::error::CommandError;

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session.
    Exit,
    /// Print the directory table in the background.
    List,
    /// Re-run the word aggregation and print the summary.
    Count,
    /// Print the command list.
    Help,
    /// Create (if absent) and open each file with its default application.
    Open(Vec<String>),
    /// Create or truncate each file.
    Create(Vec<String>),
    /// Remove each file.
    Delete(Vec<String>),
}

impl Command {
    /// Parses one trimmed, non-empty segment.
    ///
    /// Extra arguments to `exit`, `list`, `count`, and `help` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Unknown`] for an unrecognized keyword and
    /// [`CommandError::MissingArguments`] for a file command without names.
    pub fn parse(segment: &str) -> Result<Self, CommandError> {
        let mut tokens = segment.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Err(CommandError::Unknown(String::new()));
        };
        let names = || tokens.map(str::to_owned).collect::<Vec<_>>();

        let command = match keyword {
            "exit" => Self::Exit,
            "list" => Self::List,
            "count" => Self::Count,
            "help" => Self::Help,
            "open" => Self::Open(require_names("open", names())?),
            "create" => Self::Create(require_names("create", names())?),
            "delete" => Self::Delete(require_names("delete", names())?),
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(command)
    }

    /// Returns the keyword that produced this command.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::List => "list",
            Self::Count => "count",
            Self::Help => "help",
            Self::Open(_) => "open",
            Self::Create(_) => "create",
            Self::Delete(_) => "delete",
        }
    }
}

fn require_names(keyword: &'static str, names: Vec<String>) -> Result<Vec<String>, CommandError> {
    if names.is_empty() {
        Err(CommandError::MissingArguments(keyword))
    } else {
        Ok(names)
    }
}

/// Splits a line into trimmed, non-empty command segments.
pub fn segments(line: &str) -> impl Iterator<Item = &str> {
    line.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Parses every segment of a line, in order.
pub fn parse_line(line: &str) -> Vec<Result<Command, CommandError>> {
    segments(line).map(Command::parse).collect()
}
