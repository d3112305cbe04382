//! CLI entry point for the fleet word scanner and file shell.
//!
//! On startup the binary lists the target directory, counts the words in
//! every entry concurrently, and prints the statistics. It then reads
//! commands from stdin until `exit` or end of input.
//!
//! # Usage
//!
//! ```bash
//! # Scan the current directory, then enter the shell
//! fleet
//!
//! # Scan another directory and print the summary only
//! fleet --path ./docs --summary
//!
//! # Machine-readable summary with the most frequent words
//! fleet --json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use fleet_core::config::{DEFAULT_MAX_OPEN_FILES, DEFAULT_QUEUE_CAPACITY};
use fleet_core::{AggregateConfig, Config};
use fleet_scanner::Scanner;
use fleet_shell::Shell;
use parking_lot::Mutex;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Number of most frequent words included in the JSON summary.
const TOP_WORDS: usize = 10;

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Concurrent word-frequency scanner with an interactive file shell.
///
/// Counts the words in every entry of a directory, then accepts `list`,
/// `count`, `create`, `open`, `delete`, `help`, and `exit` commands.
#[derive(Parser)]
#[command(name = "fleet", version, about, long_about = None)]
struct Cli {
    /// Directory to scan and manage.
    #[arg(short, long, env = "FLEET_PATH", default_value = ".")]
    path: Utf8PathBuf,

    /// Capacity of the queue between counting tasks and the collector.
    #[arg(long, env = "FLEET_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Maximum number of files open for counting at once.
    #[arg(long, env = "FLEET_MAX_OPEN_FILES", default_value_t = DEFAULT_MAX_OPEN_FILES)]
    max_open_files: usize,

    /// Print the statistics and exit without starting the shell.
    #[arg(long)]
    summary: bool,

    /// Print the statistics as JSON and exit.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored log output.
    #[arg(long)]
    no_color: bool,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging to stderr.
///
/// Respects `RUST_LOG` if set. Otherwise uses `debug` with `--verbose` and
/// `warn` by default, so the interactive session only shows problems.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds and validates a [`Config`] from CLI arguments.
///
/// # Errors
///
/// Returns an error if the path is missing, is not a directory, or a limit
/// is zero.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let config = Config {
        root: cli.path.clone(),
        aggregate: AggregateConfig {
            queue_capacity: cli.queue_capacity,
            max_open_files: cli.max_open_files,
        },
        ..Config::default()
    };
    config.validate()?;
    Ok(config)
}

// =============================================================================
// COMMAND HANDLERS
// =============================================================================

/// Prints the statistics as pretty JSON.
async fn run_json(scanner: &Scanner) -> color_eyre::Result<()> {
    let report = scanner.scan(TOP_WORDS).await?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize JSON: {}", e))?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}")?;
    Ok(())
}

/// Lists the directory and prints the file count and statistics.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
async fn run_startup_count(scanner: &Scanner) -> color_eyre::Result<()> {
    let files = scanner.list()?;
    {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{} files in {}", files.len(), scanner.root())?;
    }

    let result = scanner.aggregate(&files).await;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{result}")?;
    Ok(())
}

/// Runs the interactive shell on stdin until `exit` or end of input.
async fn run_shell(config: &Config) -> color_eyre::Result<()> {
    let output = Arc::new(Mutex::new(std::io::stdout()));
    let shell = Shell::new(config, output)?;
    shell.run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Run on a runtime that does not wait for detached file actions
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(&cli));
    runtime.shutdown_background();
    result
}

/// Scans the directory, then routes to the requested mode.
async fn run(cli: &Cli) -> color_eyre::Result<()> {
    let config = build_config(cli)?;
    let scanner = Scanner::new(&config)?;
    info!(root = %config.root, "Starting fleet");

    if cli.json {
        return run_json(&scanner).await;
    }

    run_startup_count(&scanner).await?;
    if cli.summary {
        return Ok(());
    }

    run_shell(&config).await
}
