//! gamedb-lint - schema linter for the game compatibility database
//!
//! # Usage
//!
//! From the database checkout (reads `gamedb.toml` when present):
//! ```bash
//! gamedb-lint
//!
//! # Explicit config, different games directory
//! gamedb-lint --config tools/gamedb.toml --root ./games
//! ```
//!
//! Exits with status 0 when every game passes and 1 otherwise.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gamedb_lint::{lint_database, report, LintConfig};

#[derive(Parser)]
#[command(name = "gamedb-lint")]
#[command(about = "Validate game folders against the database schema")]
#[command(version)]
struct Cli {
    /// Path to gamedb.toml (defaults to ./gamedb.toml, then built-in settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Games directory (overrides `root` from the config)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout carries only the report)
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = LintConfig::resolve(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    config.validate()?;

    let run = lint_database(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write_report(&run, &mut out).context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    let code = report::exit_code(&run);
    if code != report::EXIT_OK {
        std::process::exit(code);
    }

    Ok(())
}
