//! The interactive read-eval loop.

use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use fleet_core::Config;
use fleet_scanner::Scanner;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::SharedOutput;
use crate::actions;
use crate::command::{Command, segments};
use crate::error::ShellError;
use crate::opener::{DefaultOpener, SystemOpener};

/// Number of most frequent words printed by `count`.
const TOP_WORDS: usize = 5;

const HELP: &str = "\
Commands (separate several with ';'):
  list                 show the files in the directory
  count                count the words in every file
  create <name...>     create (or empty) each file
  open <name...>       create if missing, then open with the default application
  delete <name...>     remove each file
  help                 show this message
  exit                 leave the shell";

/// What the loop should do after a line has been dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// End the session.
    Exit,
}

/// The outcome of dispatching one input line.
#[derive(Debug)]
pub struct Dispatch {
    /// Whether the session continues.
    pub flow: Flow,
    /// Handles of the background actions started by the line, in order.
    pub handles: Vec<JoinHandle<()>>,
}

/// Line-oriented command shell over one directory.
pub struct Shell {
    root: Utf8PathBuf,
    prompt: String,
    scanner: Scanner,
    opener: Arc<dyn DefaultOpener>,
    output: SharedOutput,
}

impl Shell {
    /// Creates a shell for `config.root` that writes to `output`.
    ///
    /// Files are opened with the [`SystemOpener`] unless replaced with
    /// [`with_opener()`](Self::with_opener).
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Scan`] if the aggregation limits are invalid.
    pub fn new(config: &Config, output: SharedOutput) -> Result<Self, ShellError> {
        Ok(Self {
            root: config.root.clone(),
            prompt: config.shell.prompt.clone(),
            scanner: Scanner::new(config)?,
            opener: Arc::new(SystemOpener),
            output,
        })
    }

    /// Replaces the default-application opener.
    #[must_use]
    pub fn with_opener(mut self, opener: Arc<dyn DefaultOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Returns the directory the shell manages.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Runs the loop until `exit` or end of input.
    ///
    /// Background actions still running when the loop ends are not awaited.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Io`] if reading a line or writing output fails.
    pub async fn run<R>(&self, input: R) -> Result<(), ShellError>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(root = %self.root, "Shell started");
        let mut lines = input.lines();

        loop {
            self.write_prompt()?;

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("End of input");
                    return Ok(());
                }
                Err(e) => {
                    error!(error = %e, "Failed to read command");
                    return Err(e.into());
                }
            };

            // Handles are dropped; actions keep running detached
            let dispatch = self.execute_line(&line).await?;
            if dispatch.flow == Flow::Exit {
                info!("Shell exited");
                return Ok(());
            }
        }
    }

    /// Dispatches every `;`-separated command of `line`, in order.
    ///
    /// Invalid segments are reported to the output and skipped. Processing
    /// stops at the first `exit`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Io`] if writing output fails.
    pub async fn execute_line(&self, line: &str) -> Result<Dispatch, ShellError> {
        let mut handles = Vec::new();

        for segment in segments(line) {
            match Command::parse(segment) {
                Ok(Command::Exit) => {
                    return Ok(Dispatch {
                        flow: Flow::Exit,
                        handles,
                    });
                }
                Ok(command) => {
                    debug!(command = command.keyword(), "Dispatching");
                    self.execute(command, &mut handles).await?;
                }
                Err(e) => self.write_line(&e.to_string())?,
            }
        }

        Ok(Dispatch {
            flow: Flow::Continue,
            handles,
        })
    }

    async fn execute(
        &self,
        command: Command,
        handles: &mut Vec<JoinHandle<()>>,
    ) -> Result<(), ShellError> {
        match command {
            Command::Exit => {}
            Command::List => {
                handles.push(actions::spawn_list(self.root.clone(), Arc::clone(&self.output)));
            }
            Command::Count => self.count().await?,
            Command::Help => self.write_line(HELP)?,
            Command::Open(names) => {
                for name in names {
                    let opener = Arc::clone(&self.opener);
                    handles.push(actions::spawn_open(self.resolve(&name), opener));
                }
            }
            Command::Create(names) => {
                handles.extend(names.iter().map(|name| actions::spawn_create(self.resolve(name))));
            }
            Command::Delete(names) => {
                handles.extend(names.iter().map(|name| actions::spawn_delete(self.resolve(name))));
            }
        }
        Ok(())
    }

    /// Re-scans the directory and prints the summary and top words.
    async fn count(&self) -> Result<(), ShellError> {
        let report = match self.scanner.scan(TOP_WORDS).await {
            Ok(report) => report,
            Err(e) => {
                warn!(root = %self.root, error = %e, "Count failed");
                return self.write_line(&format!("count: {e}"));
            }
        };

        let mut text = format!("{} files in {}\n{}", report.result.files, self.root, report.result);
        if !report.top_words.is_empty() {
            text.push_str("\nMost frequent:");
            for word in &report.top_words {
                text.push_str(&format!("\n  {:>8}  {}", word.count, word.word));
            }
        }
        self.write_line(&text)
    }

    fn resolve(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    fn write_prompt(&self) -> Result<(), ShellError> {
        let mut out = self.output.lock();
        write!(out, "{}", self.prompt)?;
        out.flush()?;
        Ok(())
    }

    fn write_line(&self, text: &str) -> Result<(), ShellError> {
        let mut out = self.output.lock();
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenError;
    use fleet_core::AggregateConfig;
    use parking_lot::Mutex;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<Utf8PathBuf>>,
    }

    impl DefaultOpener for RecordingOpener {
        fn open(&self, path: &Utf8Path) -> Result<(), OpenError> {
            self.opened.lock().push(path.to_owned());
            Ok(())
        }
    }

    struct Fixture {
        dir: TempDir,
        buffer: Arc<Mutex<Vec<u8>>>,
        opener: Arc<RecordingOpener>,
        shell: Shell,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().expect("Failed to create temp directory");
            let config = Config {
                root: Utf8Path::from_path(dir.path())
                    .expect("Invalid path")
                    .to_owned(),
                ..Default::default()
            };
            let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
            let opener = Arc::new(RecordingOpener::default());
            let shared = Arc::clone(&buffer);
            let recorder = Arc::clone(&opener);
            let shell = Shell::new(&config, shared)
                .expect("valid config")
                .with_opener(recorder);
            Self {
                dir,
                buffer,
                opener,
                shell,
            }
        }

        fn output(&self) -> String {
            String::from_utf8(self.buffer.lock().clone()).expect("UTF-8 output")
        }

        fn exists(&self, name: &str) -> bool {
            self.dir.path().join(name).exists()
        }

        async fn run_line(&self, line: &str) -> Flow {
            let dispatch = self.shell.execute_line(line).await.expect("dispatch failed");
            for handle in dispatch.handles {
                handle.await.expect("action panicked");
            }
            dispatch.flow
        }
    }

    #[tokio::test]
    async fn test_unknown_command_continues() {
        let fx = Fixture::new();
        assert_eq!(fx.run_line("bogus").await, Flow::Continue);
        assert!(fx.output().contains("unknown command: bogus"));
    }

    #[tokio::test]
    async fn test_unknown_segment_does_not_stop_line() {
        let fx = Fixture::new();
        fx.run_line("bogus; create a.txt").await;
        assert!(fx.output().contains("unknown command"));
        assert!(fx.exists("a.txt"));
    }

    #[tokio::test]
    async fn test_create_then_delete_dispatches_two_actions() {
        let fx = Fixture::new();
        let dispatch = fx
            .shell
            .execute_line("create foo.txt;delete foo.txt")
            .await
            .expect("dispatch failed");
        assert_eq!(dispatch.flow, Flow::Continue);
        assert_eq!(dispatch.handles.len(), 2);
        // Completion order is not guaranteed, only that both finish
        for handle in dispatch.handles {
            handle.await.expect("action panicked");
        }
    }

    #[tokio::test]
    async fn test_create_and_delete_in_separate_lines() {
        let fx = Fixture::new();
        fx.run_line("create foo.txt bar.txt").await;
        assert!(fx.exists("foo.txt"));
        assert!(fx.exists("bar.txt"));

        fx.run_line("delete foo.txt").await;
        assert!(!fx.exists("foo.txt"));
        assert!(fx.exists("bar.txt"));
    }

    #[tokio::test]
    async fn test_missing_arguments_start_no_action() {
        let fx = Fixture::new();
        let dispatch = fx.shell.execute_line("create").await.expect("dispatch failed");
        assert!(dispatch.handles.is_empty());
        assert!(
            fx.output()
                .contains("create: please provide at least one file name")
        );
    }

    #[tokio::test]
    async fn test_exit_stops_remaining_segments() {
        let fx = Fixture::new();
        assert_eq!(fx.run_line("exit; create never.txt").await, Flow::Exit);
        assert!(!fx.exists("never.txt"));
    }

    #[tokio::test]
    async fn test_open_uses_opener() {
        let fx = Fixture::new();
        fx.run_line("open new.txt").await;
        assert!(fx.exists("new.txt"));
        assert_eq!(fx.opener.opened.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_list_prints_table() {
        let fx = Fixture::new();
        fs::write(fx.dir.path().join("a.txt"), "the cat sat").expect("write failed");
        fx.run_line("list").await;

        let out = fx.output();
        assert!(out.contains("| File Name"));
        assert!(out.contains("| a.txt"));
        assert!(out.contains("| 11 bytes"));
    }

    #[tokio::test]
    async fn test_count_prints_summary_and_top_words() {
        let fx = Fixture::new();
        fs::write(fx.dir.path().join("a.txt"), "the cat sat").expect("write failed");
        fs::write(fx.dir.path().join("b.txt"), "the dog sat down").expect("write failed");

        fx.run_line("count").await;

        let out = fx.output();
        assert!(out.contains("2 files in"));
        assert!(out.contains("5 different words"));
        assert!(out.contains("7 total words"));
        assert!(out.contains("Most frequent:"));
        assert!(out.contains("2  sat"));
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let fx = Fixture::new();
        fx.run_line("help").await;
        let out = fx.output();
        for keyword in ["list", "count", "create", "open", "delete", "exit"] {
            assert!(out.contains(keyword), "help is missing {keyword}");
        }
    }

    #[tokio::test]
    async fn test_run_until_exit() {
        let fx = Fixture::new();
        let input: &[u8] = b"bogus\n\nexit\ncreate never.txt\n";

        fx.shell
            .run(tokio::io::BufReader::new(input))
            .await
            .expect("session failed");

        let out = fx.output();
        assert_eq!(out.matches("Enter command: ").count(), 3);
        assert!(out.contains("unknown command: bogus"));
        assert!(!fx.exists("never.txt"));
    }

    #[tokio::test]
    async fn test_run_ends_at_eof() {
        let fx = Fixture::new();
        let input: &[u8] = b"";

        fx.shell
            .run(tokio::io::BufReader::new(input))
            .await
            .expect("session failed");

        assert_eq!(fx.output(), "Enter command: ");
    }

    struct SlowOpener;

    impl DefaultOpener for SlowOpener {
        fn open(&self, _path: &Utf8Path) -> Result<(), OpenError> {
            std::thread::sleep(std::time::Duration::from_secs(3));
            Ok(())
        }
    }

    #[test]
    fn test_exit_does_not_wait_for_slow_open() {
        let fx = Fixture::new();
        let shell = fx.shell.with_opener(Arc::new(SlowOpener));
        let input: &[u8] = b"open slow.txt\nexit\n";

        let started = std::time::Instant::now();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        runtime
            .block_on(shell.run(tokio::io::BufReader::new(input)))
            .expect("session failed");
        runtime.shutdown_background();

        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_new_rejects_invalid_limits() {
        let config = Config {
            aggregate: AggregateConfig {
                queue_capacity: 0,
                max_open_files: 1,
            },
            ..Default::default()
        };
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        assert!(matches!(
            Shell::new(&config, buffer),
            Err(ShellError::Scan(_))
        ));
    }
}
