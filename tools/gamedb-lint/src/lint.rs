//! Whole-database run: walk the game folders and validate each one.

use std::ffi::OsStr;

use anyhow::Result;

use crate::config::LintConfig;
use crate::findings::Findings;
use crate::fs;
use crate::game;

/// How validation of one game ended.
#[derive(Debug)]
pub enum GameOutcome {
    /// Every validator ran (schema errors may still have been recorded)
    Checked,
    /// An unexpected failure cut the game short
    Aborted(anyhow::Error),
}

/// A game whose validation was cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortedGame {
    pub game: String,
    pub reason: String,
}

/// Result of one linter run.
#[derive(Debug, Default)]
pub struct LintRun {
    pub findings: Findings,
    /// Game folders visited, including aborted ones
    pub games_scanned: usize,
    pub aborted: Vec<AbortedGame>,
}

impl LintRun {
    /// True when no validation errors were recorded.
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Validate every game folder under the configured root.
///
/// Fails only if the root itself cannot be listed.
pub fn lint_database(config: &LintConfig) -> Result<LintRun> {
    if !config.root.is_dir() {
        anyhow::bail!("Games directory not found: {}", config.root.display());
    }

    let games = fs::game_folders(&config.root, &config.skip)?;
    tracing::info!(
        "Checking {} game(s) in {}",
        games.len(),
        config.root.display()
    );

    let mut run = LintRun::default();
    for name in &games {
        if let GameOutcome::Aborted(error) = lint_game(config, name, &mut run.findings) {
            let game = name.to_string_lossy();
            tracing::warn!("Validation of {} aborted: {:#}", game, error);
            run.aborted.push(AbortedGame {
                game: game.into_owned(),
                reason: format!("{error:#}"),
            });
        }
        run.games_scanned += 1;
    }

    tracing::info!(
        "Checked {} game(s): {} error(s), {} aborted",
        run.games_scanned,
        run.findings.len(),
        run.aborted.len()
    );

    Ok(run)
}

/// Validate one game folder, catching unexpected failures.
///
/// `name` is the folder name as found on disk; errors are reported under its
/// lossy UTF-8 form.
pub fn lint_game(config: &LintConfig, name: &OsStr, findings: &mut Findings) -> GameOutcome {
    let dir = config.root.join(name);
    let game = name.to_string_lossy();
    let mut rec = findings.for_game(&game);

    match game::validate_game(config, &dir, &mut rec) {
        Ok(()) => {
            tracing::debug!("{}: {} error(s)", rec.game(), rec.recorded());
            GameOutcome::Checked
        }
        Err(error) => GameOutcome::Aborted(error),
    }
}
