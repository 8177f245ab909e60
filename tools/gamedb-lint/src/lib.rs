//! gamedb-lint library
//!
//! Validates a game compatibility database: one folder per game, each holding
//! box art, an icon, a `game.dat` metadata document, and optional screenshot
//! and save folders. Every violation is collected; nothing is repaired.

pub mod config;
pub mod error;
pub mod findings;
pub mod fs;
pub mod game;
pub mod images;
pub mod lint;
pub mod metadata;
pub mod report;
pub mod saves;

pub use config::{ImageConstraint, LintConfig};
pub use error::ConfigError;
pub use findings::{Findings, GameRecorder, ValidationError};
pub use lint::{lint_database, AbortedGame, GameOutcome, LintRun};
