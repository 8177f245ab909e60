//! Save bundle checks.
//!
//! Each save is a `<name>.dat` metadata document paired with a `<name>.zip`
//! archive. Every distinct basename in the saves folder forms one group, so a
//! lone `slot1.zip` is reported as missing its `slot1.dat`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::findings::GameRecorder;
use crate::fs;
use crate::metadata;

/// Local file header signature every ZIP archive starts with.
pub const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Distinct extension-less basenames, in order of first appearance.
pub fn save_groups(files: &[PathBuf]) -> Vec<OsString> {
    let mut groups: Vec<OsString> = Vec::new();
    for file in files {
        let Some(stem) = file.file_stem() else {
            continue;
        };
        if !groups.iter().any(|group| group == stem) {
            groups.push(stem.to_os_string());
        }
    }
    groups
}

/// Validate every save group in `dir`. A missing directory is skipped.
pub fn validate_saves(dir: &Path, dirname: &str, rec: &mut GameRecorder<'_>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() {
        rec.record(format!("{dirname}: not a directory"));
        return Ok(());
    }

    let files = fs::list_files(dir)?;
    for group in save_groups(&files) {
        let label = format!("{dirname}/{}", group.to_string_lossy());

        metadata::validate_save_document(
            &dir.join(with_suffix(&group, ".dat")),
            &format!("{label}.dat"),
            rec,
        )?;
        validate_archive(
            &dir.join(with_suffix(&group, ".zip")),
            &format!("{label}.zip"),
            rec,
        )?;
    }

    Ok(())
}

/// `stem` + `suffix`, without `Path::with_extension` eating dotted stems.
fn with_suffix(stem: &OsStr, suffix: &str) -> OsString {
    let mut name = stem.to_os_string();
    name.push(suffix);
    name
}

/// Check the archive exists and starts with the ZIP signature.
pub fn validate_archive(path: &Path, label: &str, rec: &mut GameRecorder<'_>) -> Result<()> {
    if !path.exists() {
        rec.record(format!("{label}: file not found"));
        return Ok(());
    }

    let header = fs::read_prefix(path, ZIP_MAGIC.len())?;
    if header != ZIP_MAGIC {
        rec.record(format!(
            "{label}: not a zip archive (header {}, expected {})",
            hex_bytes(&header),
            hex_bytes(&ZIP_MAGIC)
        ));
    }

    Ok(())
}

fn hex_bytes(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "empty".to_string();
    }
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
