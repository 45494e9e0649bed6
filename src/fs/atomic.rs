//! Atomic file replacement.
//!
//! Version records and component definitions are rewritten in place inside a
//! CI checkout. A step killed mid-write must never leave a truncated YAML file
//! behind, so every write follows the same pattern:
//! 1. Write content to `.{filename}.tmp` in the same directory
//! 2. fsync the temporary file
//! 3. `rename()` it over the target (replaces existing files on every platform
//!    std supports, atomic when both paths share a filesystem)

use crate::error::{ReleaseError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ReleaseError::Io(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ReleaseError::Io(format!("failed to replace '{}': {}", path.display(), e))
    })
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ReleaseError::Io(format!("invalid file path '{}'", target.display())))?;

    Ok(target.with_file_name(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        ReleaseError::Io(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(path);
            ReleaseError::Io(format!(
                "failed to write temporary file '{}': {}",
                path.display(),
                e
            ))
        })
}
