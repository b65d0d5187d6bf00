//! Atomic file replacement
//!
//! Content is written to a temporary file in the target directory, fsynced,
//! and renamed over the target. Readers see either the old document or the
//! new one, never a partial write. On Windows the rename is retried briefly
//! because virus scanners and indexers hold transient handles.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

#[cfg(windows)]
use std::{thread, time::Duration};

/// Rename attempts on Windows before the last error is returned.
#[cfg(windows)]
const RENAME_ATTEMPTS: u32 = 6;

/// Atomically replace `path` with `content`, creating parent directories.
///
/// Returns the number of rename retries that were needed (always 0 off
/// Windows).
pub fn write_file_atomic(path: &Utf8Path, content: &[u8]) -> Result<u32> {
    let dir = non_empty_parent(path);
    if let Some(parent) = dir {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {parent}"))?;
    }

    let dir = dir.unwrap_or_else(|| Utf8Path::new("."));
    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in: {dir}"))?;
    temp_file
        .write_all(content)
        .context("Failed to write content to temporary file")?;
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to fsync temporary file")?;

    let retries = persist(temp_file, path.as_std_path())
        .with_context(|| format!("Failed to atomically write file: {path}"))?;
    if retries > 0 {
        tracing::debug!(path = %path, retries, "Rename needed retries");
    }
    Ok(retries)
}

/// `Utf8Path::parent` returns `Some("")` for bare file names.
fn non_empty_parent(path: &Utf8Path) -> Option<&Utf8Path> {
    path.parent().filter(|p| !p.as_str().is_empty())
}

#[cfg(not(windows))]
fn persist(temp_file: NamedTempFile, target: &Path) -> Result<u32> {
    temp_file.persist(target).map_err(|e| e.error)?;
    Ok(0)
}

/// Windows: scanners and indexers briefly hold handles on fresh files, so a
/// denied rename is retried with doubling sleeps (10ms, 20ms, ...).
#[cfg(windows)]
fn persist(mut temp_file: NamedTempFile, target: &Path) -> Result<u32> {
    use std::io::ErrorKind;

    let mut retries = 0;
    loop {
        match temp_file.persist(target) {
            Ok(_) => return Ok(retries),
            Err(err)
                if retries + 1 < RENAME_ATTEMPTS
                    && matches!(err.error.kind(), ErrorKind::PermissionDenied) =>
            {
                thread::sleep(Duration::from_millis(10 << retries));
                retries += 1;
                temp_file = err.file;
            }
            Err(err) => return Err(err.error.into()),
        }
    }
}
