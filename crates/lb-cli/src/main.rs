//! CLI entry point for lsp-bridge.
//!
//! The binary drives the watcher and scope engine without a language server
//! attached: notifications are logged by a dry-run client and symbol data
//! is read from a JSON file in the protocol's document-symbol shape.
//!
//! # Usage
//!
//! ```bash
//! lsp-bridge [OPTIONS] <COMMAND>
//!
//! # Watch a workspace and log the notifications a server would receive
//! lsp-bridge watch --workspace ~/src/app --pattern '**/*.go'
//!
//! # Group positions into scopes using a saved symbol response
//! lsp-bridge scope --file main.go --symbols main.symbols.json --at 12:4 --at 30
//!
//! # Print a symbol tree
//! lsp-bridge symbols --file main.go --symbols main.symbols.json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod dry_run;

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use lb_core::{Config, GlobSpec, Position, WatchRegistration};
use lb_scope::{SourceText, format_window, full_definition, group_references, indent_block, number_lines, render_window};
use lb_tools::document_symbols_report;
use lb_watcher::WorkspaceWatcher;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::dry_run::DryRunClient;

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Bridge between a workspace and a language server.
///
/// Watches files and turns changes into protocol notifications, and
/// resolves code positions to the scopes that enclose them.
#[derive(Parser)]
#[command(name = "lsp-bridge", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file.
    ///
    /// Missing fields take their defaults.
    #[arg(short, long, global = true, env = "LSP_BRIDGE_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level, every raw watch event).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Watch a workspace and log the notifications it produces.
    Watch {
        /// Workspace root.
        #[arg(short, long, env = "LSP_BRIDGE_WORKSPACE", default_value = ".")]
        workspace: Utf8PathBuf,

        /// Glob patterns to register, relative to the workspace root.
        #[arg(short, long = "pattern", default_value = "**/*")]
        patterns: Vec<String>,
    },

    /// Group positions in a file into their enclosing scopes.
    Scope {
        /// Source file.
        #[arg(short, long)]
        file: Utf8PathBuf,

        /// Document-symbol response for the file, as JSON.
        #[arg(short, long)]
        symbols: Utf8PathBuf,

        /// Positions as `LINE` or `LINE:COLUMN`, 1-based.
        #[arg(long = "at", required = true, value_parser = parse_position)]
        positions: Vec<Position>,

        /// Print the full enclosing definition for each position instead.
        #[arg(long)]
        definition: bool,

        /// Omit line numbers.
        #[arg(long)]
        no_line_numbers: bool,
    },

    /// Print the symbol tree of a file.
    Symbols {
        /// Source file.
        #[arg(short, long)]
        file: Utf8PathBuf,

        /// Document-symbol response for the file, as JSON.
        #[arg(short, long)]
        symbols: Utf8PathBuf,

        /// Omit line numbers.
        #[arg(long)]
        no_line_numbers: bool,
    },
}

/// Parses a 1-based `LINE[:COLUMN]` into a protocol position.
fn parse_position(value: &str) -> Result<Position, String> {
    let (line, column) = match value.split_once(':') {
        Some((line, column)) => (line, Some(column)),
        None => (value, None),
    };
    let line: u32 = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line in {value:?}"))?;
    let column: u32 = match column {
        Some(column) => column
            .trim()
            .parse()
            .map_err(|_| format!("invalid column in {value:?}"))?,
        None => 1,
    };
    if line == 0 || column == 0 {
        return Err(format!("positions are 1-based, got {value:?}"));
    }
    Ok(Position::new(line - 1, column - 1))
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set. Otherwise uses `debug` with `--verbose` and
/// `info` by default, with `notify` and `mio` pinned to `warn`. Logs go to
/// stderr; stdout carries report text only.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},mio=warn,notify=warn"))
    });

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

/// Loads the configuration file if given, then applies flag overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
fn load_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("Failed to load config from {path}"))?,
        None => Config::default(),
    };
    config.watch.verbose |= cli.verbose;
    Ok(config)
}

/// Reads a symbol file into a dry-run client.
fn symbol_client(symbols: &Utf8PathBuf) -> color_eyre::Result<DryRunClient> {
    let response = DryRunClient::load_symbols(symbols)
        .wrap_err_with(|| format!("Failed to load symbols from {symbols}"))?;
    Ok(DryRunClient::new().with_symbols(response))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Watches `workspace` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the root does not exist or the watch loop fails.
async fn run_watch(
    config: &Config,
    workspace: &Utf8PathBuf,
    patterns: &[String],
) -> color_eyre::Result<()> {
    let client = Arc::new(DryRunClient::new());
    let watcher = WorkspaceWatcher::new(Arc::clone(&client) as _, workspace, config)?;
    info!(root = %watcher.root(), patterns = patterns.len(), "Starting watcher");

    let base = watcher.root().to_string();
    let registrations = patterns
        .iter()
        .map(|pattern| WatchRegistration::new(GlobSpec::relative(base.as_str(), pattern.as_str())))
        .collect();

    let cancel = CancellationToken::new();
    let mut watch = tokio::spawn(Arc::clone(&watcher).watch(cancel.clone()));

    if let Some(open) = watcher.add_registrations("cli", registrations) {
        let stats = open.await??;
        info!(
            scanned = stats.scanned,
            matched = stats.matched,
            opened = stats.opened,
            failed = stats.failed,
            "Initial open complete"
        );
    }

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received Ctrl-C, shutting down");
            cancel.cancel();
            watch.await??;
        }
        result = &mut watch => {
            result??;
        }
    }

    info!(open_files = client.open_count(), "Watcher stopped");
    Ok(())
}

/// Prints the scopes (or full definitions) enclosing each position.
///
/// # Errors
///
/// Returns an error if the source or symbol file cannot be read.
fn run_scope(
    config: &Config,
    file: &Utf8PathBuf,
    symbols: &Utf8PathBuf,
    positions: &[Position],
    definition: bool,
    show_line_numbers: bool,
) -> color_eyre::Result<()> {
    let tree = DryRunClient::load_symbols(symbols)
        .wrap_err_with(|| format!("Failed to load symbols from {symbols}"))?
        .into_tree();
    let source = SourceText::read(file)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if definition {
        for position in positions {
            match full_definition(&source, &tree, *position) {
                Ok(def) => {
                    writeln!(
                        handle,
                        "L{}: lines {}-{}",
                        position.line + 1,
                        def.range.start.line + 1,
                        def.range.end.line + 1
                    )?;
                    if show_line_numbers {
                        write!(handle, "{}", number_lines(&def.text, def.range.start.line + 1))?;
                    } else {
                        writeln!(handle, "{}", def.text)?;
                    }
                }
                Err(err) => writeln!(handle, "L{}: {err}", position.line + 1)?,
            }
        }
        return Ok(());
    }

    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    let scopes = group_references(&tree, Some(&source), &sorted, &config.render);

    writeln!(handle, "File: {file} ({} positions)", sorted.len())?;
    for scope in &scopes {
        writeln!(handle, "{}", scope.header())?;
        let rendered = render_window(
            &scope.text,
            scope.id.start_line + 1,
            &scope.highlight_offsets(),
            &config.render,
        );
        writeln!(handle, "{}", indent_block(&format_window(&rendered, show_line_numbers)))?;
    }
    Ok(())
}

/// Prints the symbol tree of `file`.
///
/// # Errors
///
/// Returns an error if the symbol file cannot be read.
async fn run_symbols(
    file: &Utf8PathBuf,
    symbols: &Utf8PathBuf,
    show_line_numbers: bool,
) -> color_eyre::Result<()> {
    let client = symbol_client(symbols)?;
    if !file.exists() {
        return Err(eyre!("File does not exist: {file}"));
    }
    let report = document_symbols_report(&client, file, show_line_numbers).await?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", report.trim_end())?;
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (stderr, honours --no-color)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Load configuration
    let config = load_config(&cli)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Watch {
            workspace,
            patterns,
        } => run_watch(&config, workspace, patterns).await,
        Commands::Scope {
            file,
            symbols,
            positions,
            definition,
            no_line_numbers,
        } => run_scope(&config, file, symbols, positions, *definition, !*no_line_numbers),
        Commands::Symbols {
            file,
            symbols,
            no_line_numbers,
        } => run_symbols(file, symbols, !*no_line_numbers).await,
    }
}
