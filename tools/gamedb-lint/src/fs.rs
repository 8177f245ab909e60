//! Filesystem helpers for walking the game database.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

/// Maximum allowed size for a metadata document read into memory.
pub const MAX_DOCUMENT_BYTES: u64 = 4 * 1024 * 1024; // 4 MiB

/// Read a whole metadata document, refusing anything over `max_bytes`.
///
/// The cap is enforced on the bytes actually read, so a file that grows after
/// it was opened cannot slip past it.
pub fn read_document(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open document: {}", path.display()))?;
    let mut bytes = Vec::new();
    file.take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    if bytes.len() as u64 > max_bytes {
        anyhow::bail!(
            "Document too large: {} (over {} bytes)",
            path.display(),
            max_bytes
        );
    }
    Ok(bytes)
}

/// Read at most `len` leading bytes of a file.
///
/// Shorter files yield fewer bytes rather than an error.
pub fn read_prefix(path: &Path, len: usize) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut prefix = Vec::with_capacity(len);
    file.take(len as u64)
        .read_to_end(&mut prefix)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(prefix)
}

/// Immediate children of `dir`, sorted by file name.
fn children(dir: &Path) -> Result<Vec<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory: {}", dir.display()))
}

/// Names of the immediate subdirectories of `dir`. Symlinked directories are
/// not followed.
pub fn list_dirs(dir: &Path) -> Result<Vec<OsString>> {
    Ok(children(dir)?
        .into_iter()
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.file_name().to_os_string())
        .collect())
}

/// Paths of the immediate files in `dir` (non-recursive).
///
/// Symlinks are kept when their target is a file, so linked assets are
/// validated like any other.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(children(dir)?
        .into_iter()
        .filter(|entry| entry.path().is_file())
        .map(DirEntry::into_path)
        .collect())
}

/// Game folder names under `root`, with reserved folders removed.
pub fn game_folders(root: &Path, skip: &[String]) -> Result<Vec<OsString>> {
    let mut games = list_dirs(root)?;
    games.retain(|name| !skip.iter().any(|reserved| name.as_os_str() == reserved.as_str()));
    Ok(games)
}
