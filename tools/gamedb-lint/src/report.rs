//! End-of-run console report and exit status.

use std::io::{self, Write};

use crate::lint::LintRun;

/// Process exit code when no validation errors were recorded.
pub const EXIT_OK: i32 = 0;
/// Process exit code when at least one validation error was recorded.
pub const EXIT_FAILED: i32 = 1;

/// Write the human-readable summary.
///
/// A clean run prints one line. Otherwise errors are grouped by game, each
/// message on its own indented bullet, in the order they were recorded.
pub fn write_report(run: &LintRun, out: &mut impl Write) -> io::Result<()> {
    if run.passed() {
        write!(
            out,
            "All {} game(s) passed validation.",
            run.games_scanned
        )?;
        if !run.aborted.is_empty() {
            write!(out, " ({} aborted, see log)", run.aborted.len())?;
        }
        writeln!(out)?;
        return Ok(());
    }

    let groups = run.findings.grouped();
    writeln!(out, "=== Validation Failed ===")?;
    writeln!(
        out,
        "{} error(s) in {} of {} game(s)",
        run.findings.len(),
        groups.len(),
        run.games_scanned
    )?;

    for (game, messages) in groups {
        writeln!(out)?;
        writeln!(out, "{}", game)?;
        for message in messages {
            writeln!(out, "  - {}", message)?;
        }
    }

    Ok(())
}

pub fn exit_code(run: &LintRun) -> i32 {
    if run.passed() { EXIT_OK } else { EXIT_FAILED }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::AbortedGame;

    fn render(run: &LintRun) -> String {
        let mut out = Vec::new();
        write_report(run, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_success_report() {
        let run = LintRun {
            games_scanned: 3,
            ..Default::default()
        };

        assert_eq!(render(&run), "All 3 game(s) passed validation.\n");
        assert_eq!(exit_code(&run), EXIT_OK);
    }

    #[test]
    fn test_success_report_mentions_aborted() {
        let run = LintRun {
            games_scanned: 2,
            aborted: vec![AbortedGame {
                game: "broken".into(),
                reason: "Failed to read file".into(),
            }],
            ..Default::default()
        };

        assert_eq!(
            render(&run),
            "All 2 game(s) passed validation. (1 aborted, see log)\n"
        );
        assert_eq!(exit_code(&run), EXIT_OK);
    }

    #[test]
    fn test_failure_report_groups_by_game() {
        let mut run = LintRun {
            games_scanned: 4,
            ..Default::default()
        };
        {
            let mut rec = run.findings.for_game("zelda");
            rec.record("boxart.png: file not found");
            rec.record("game.dat: no releases");
        }
        run.findings.for_game("mario").record("icon.png: is 1x1, expected 48x48");

        assert_eq!(
            render(&run),
            "=== Validation Failed ===\n\
             3 error(s) in 2 of 4 game(s)\n\
             \n\
             zelda\n  - boxart.png: file not found\n  - game.dat: no releases\n\
             \n\
             mario\n  - icon.png: is 1x1, expected 48x48\n"
        );
        assert_eq!(exit_code(&run), EXIT_FAILED);
    }
}
