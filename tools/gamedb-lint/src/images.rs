//! Image asset checks (box art, icon, screenshots).
//!
//! Format and dimensions are checked independently: an image with the wrong
//! format and the wrong size produces two errors.

use std::path::Path;

use anyhow::Result;
use image::{ImageError, ImageReader};

use crate::config::ImageConstraint;
use crate::findings::GameRecorder;
use crate::fs;

/// Leading bytes read to sniff the container format.
pub const HEADER_PROBE_BYTES: usize = 32;

/// Detect an image's media type from its leading bytes.
pub fn detect_mime(header: &[u8]) -> Option<&'static str> {
    image::guess_format(header)
        .ok()
        .map(|format| format.to_mime_type())
}

/// Validate a single image against its constraint.
///
/// `label` names the file in recorded messages (path relative to the game).
pub fn validate_image(
    path: &Path,
    label: &str,
    constraint: ImageConstraint<'_>,
    rec: &mut GameRecorder<'_>,
) -> Result<()> {
    if !path.exists() {
        rec.record(format!("{label}: file not found"));
        return Ok(());
    }

    let header = fs::read_prefix(path, HEADER_PROBE_BYTES)?;
    let actual = detect_mime(&header);
    if actual != Some(constraint.mime) {
        rec.record(format!(
            "{label}: has type {}, expected {}",
            actual.unwrap_or("unknown"),
            constraint.mime
        ));
    }

    match read_dimensions(path) {
        Ok((width, height)) => {
            if width != constraint.width || height != constraint.height {
                rec.record(format!(
                    "{label}: is {width}x{height}, expected {}x{}",
                    constraint.width, constraint.height
                ));
            }
        }
        // The header was readable, so decode failures are content problems.
        Err(e) => {
            rec.record(format!(
                "{label}: could not read dimensions ({e}), expected {}x{}",
                constraint.width, constraint.height
            ));
        }
    }

    Ok(())
}

/// Validate every file in `dir` against one shared constraint.
///
/// A missing directory is not an error; something other than a directory in
/// its place is.
pub fn validate_dir_images(
    dir: &Path,
    dirname: &str,
    constraint: ImageConstraint<'_>,
    rec: &mut GameRecorder<'_>,
) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() {
        rec.record(format!("{dirname}: not a directory"));
        return Ok(());
    }

    for path in fs::list_files(dir)? {
        let label = match path.file_name() {
            Some(name) => format!("{dirname}/{}", name.to_string_lossy()),
            None => dirname.to_string(),
        };
        validate_image(&path, &label, constraint, rec)?;
    }

    Ok(())
}

/// Decode width and height, sniffing the format from content rather than extension.
fn read_dimensions(path: &Path) -> Result<(u32, u32), ImageError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
}
