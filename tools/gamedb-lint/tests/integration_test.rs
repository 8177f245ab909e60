//! Integration tests for gamedb-lint
//!
//! Builds fixture databases on disk, runs the binary, and checks the report
//! and exit status.

mod generate_test_games;

use std::path::Path;
use std::process::Output;
use tempfile::tempdir;

fn run_lint(config: &Path) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_gamedb-lint"))
        .args(["--config", config.to_str().unwrap()])
        .output()
        .expect("Failed to run gamedb-lint")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_clean_database_exits_zero() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = generate_test_games::write_config(dir.path());
    let games = dir.path().join("games");
    generate_test_games::write_valid_game(&games, "alpha");
    generate_test_games::write_valid_game(&games, "beta");

    let output = run_lint(&config);

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert_eq!(stdout(&output), "All 2 game(s) passed validation.\n");
}

#[test]
fn test_reserved_folders_are_ignored() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = generate_test_games::write_config(dir.path());
    let games = dir.path().join("games");
    generate_test_games::write_valid_game(&games, "alpha");
    std::fs::create_dir_all(games.join(".git/objects")).unwrap();
    std::fs::create_dir_all(games.join("_validation")).unwrap();

    let output = run_lint(&config);

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
}

#[test]
fn test_invalid_game_exits_one_and_lists_errors() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = generate_test_games::write_config(dir.path());
    let games = dir.path().join("games");
    generate_test_games::write_valid_game(&games, "alpha");
    let broken = generate_test_games::write_valid_game(&games, "broken");
    generate_test_games::write_png(&broken.join("boxart.png"), 100, 100);
    std::fs::remove_file(broken.join("savefiles/slot1.dat")).unwrap();

    let output = run_lint(&config);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        text,
        "=== Validation Failed ===\n\
         2 error(s) in 1 of 2 game(s)\n\
         \n\
         broken\n  - boxart.png: is 100x100, expected 8x6\n  - savefiles/slot1.dat: file not found\n"
    );
}

#[test]
fn test_release_scenario_reports_both_errors() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = generate_test_games::write_config(dir.path());
    let game = generate_test_games::write_valid_game(&dir.path().join("games"), "alpha");
    let dat = generate_test_games::GAME_DAT
        .replace("title = \"0004000000012345\"", "title = \"short\"")
        .replace("region = \"USA\"", "region = \"ZZ\"");
    std::fs::write(game.join("game.dat"), dat).unwrap();

    let output = run_lint(&config);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(text.contains("  - game.dat: 'releases[0].title' must be 16 characters, found 5\n"));
    assert!(text.contains("  - game.dat: 'releases[0].region' has invalid region 'ZZ'\n"));
    assert!(text.contains("2 error(s) in 1 of 1 game(s)"));
}

#[test]
fn test_unparseable_game_dat_single_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = generate_test_games::write_config(dir.path());
    let game = generate_test_games::write_valid_game(&dir.path().join("games"), "alpha");
    std::fs::write(game.join("game.dat"), "title = nope\n[[releases]]\n").unwrap();

    let output = run_lint(&config);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(text.contains("1 error(s) in 1 of 1 game(s)"), "{text}");
    assert!(text.contains("  - game.dat: parse error at line 1: "), "{text}");
}

#[test]
fn test_output_is_stable_across_runs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = generate_test_games::write_config(dir.path());
    let games = dir.path().join("games");
    generate_test_games::write_valid_game(&games, "alpha");
    std::fs::create_dir_all(games.join("empty")).unwrap();

    let first = run_lint(&config);
    let second = run_lint(&config);

    assert_eq!(first.status.code(), second.status.code());
    assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn test_root_flag_overrides_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = generate_test_games::write_config(dir.path());
    let other = dir.path().join("other");
    generate_test_games::write_valid_game(&other, "alpha");
    generate_test_games::write_valid_game(&other, "beta");
    generate_test_games::write_valid_game(&other, "gamma");

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_gamedb-lint"))
        .args([
            "--config",
            config.to_str().unwrap(),
            "--root",
            other.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run gamedb-lint");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "All 3 game(s) passed validation.\n");
}

#[test]
fn test_missing_root_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = generate_test_games::write_config(dir.path());
    std::fs::remove_dir(dir.path().join("games")).unwrap();

    let output = run_lint(&config);

    assert!(!output.status.success());
}
