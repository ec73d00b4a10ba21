//! Static asset copying.
//!
//! Everything under the static directory (images, fonts, favicons, CNAME) is
//! copied verbatim into the output directory, keeping its relative layout.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

/// Asset copying errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset outside the source directory.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Copy `source_dir` into `dest_dir`, returning the copied paths relative to
/// `dest_dir`.
///
/// A missing source directory copies nothing. Hidden files are skipped.
pub fn copy_static(source_dir: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();

    if !source_dir.exists() {
        debug!(source = %source_dir.display(), "no static directory, skipping");
        return Ok(copied);
    }

    info!(
        source = %source_dir.display(),
        dest = %dest_dir.display(),
        "copying static assets"
    );

    copy_dir(source_dir, source_dir, dest_dir, &mut copied)?;

    info!(count = copied.len(), "static assets copied");
    Ok(copied)
}

fn copy_dir(base: &Path, current: &Path, dest: &Path, copied: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();

        if path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'))
        {
            continue;
        }

        if path.is_dir() {
            copy_dir(base, &path, dest, copied)?;
        } else if path.is_file() {
            let relative = path
                .strip_prefix(base)
                .map_err(|_| AssetError::InvalidPath(path.clone()))?;
            let target = dest.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&path, &target)?;
            debug!(src = %path.display(), dest = %target.display(), "copied asset");

            copied.push(relative.to_path_buf());
        }
    }

    Ok(())
}
