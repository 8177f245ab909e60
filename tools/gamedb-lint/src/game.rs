//! Per-game validation.

use std::path::Path;

use anyhow::Result;

use crate::config::LintConfig;
use crate::findings::GameRecorder;
use crate::{images, metadata, saves};

/// Run every validator over one game folder.
///
/// Schema violations are recorded and never stop the remaining checks. An
/// `Err` means something unexpected (e.g. an unreadable file) and abandons
/// the rest of this game; errors recorded before it are kept.
pub fn validate_game(config: &LintConfig, dir: &Path, rec: &mut GameRecorder<'_>) -> Result<()> {
    images::validate_image(
        &dir.join(&config.boxart.filename),
        &config.boxart.filename,
        config.boxart.constraint(),
        rec,
    )?;

    images::validate_image(
        &dir.join(&config.icon.filename),
        &config.icon.filename,
        config.icon.constraint(),
        rec,
    )?;

    metadata::validate_game_document(
        &dir.join(&config.metadata),
        &config.metadata,
        &config.regions,
        rec,
    )?;

    images::validate_dir_images(
        &dir.join(&config.screenshots.dirname),
        &config.screenshots.dirname,
        config.screenshots.constraint(),
        rec,
    )?;

    saves::validate_saves(
        &dir.join(&config.saves.dirname),
        &config.saves.dirname,
        rec,
    )?;

    Ok(())
}
