//! Image discovery in directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Supported image extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "tif", "tiff", "ppm", "webp",
];

/// Recursively list images under `dir`, sorted by path.
///
/// Hidden directories are skipped.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::Dataset(format!("Path does not exist: {}", dir.display())));
    }

    if !dir.is_dir() {
        return Err(Error::Dataset(format!("Path is not a directory: {}", dir.display())));
    }

    let mut images = Vec::new();
    discover_recursive(dir, &mut images)?;
    images.sort();
    Ok(images)
}

fn discover_recursive(current: &Path, images: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(current).map_err(|e| {
        Error::Dataset(format!("Failed to read directory {}: {}", current.display(), e))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::Dataset(format!("Failed to read entry in {}: {}", current.display(), e))
        })?;

        let path = entry.path();

        if path.is_dir() {
            if path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or(false, |s| s.starts_with('.'))
            {
                continue;
            }
            discover_recursive(&path, images)?;
        } else if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }

    Ok(())
}

/// Whether `path` has a supported image extension (case-insensitive).
#[must_use]
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}
