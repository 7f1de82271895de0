//! Source folder scanning.
//!
//! First stage of a gallery run. Lists the image files directly inside the
//! source folder (no recursion) and turns each into an [`ImageEntry`].
//!
//! ```text
//! photos/
//! ├── picture-table.toml    # Settings, not an image
//! ├── .hidden.jpg           # Skipped (hidden)
//! ├── dawn.jpg              # Entry, caption from dawn.txt
//! ├── dawn.txt
//! ├── dusk.PNG              # Entry (extensions match case-insensitively)
//! └── thumbnails/           # Output of earlier runs, skipped
//! ```
//!
//! Entries are sorted by file name so the table order is stable between runs.
//! Files listed in `exclude` are kept with `export = false`; downstream
//! stages skip them.

use crate::config::GallerySettings;
use crate::imaging::supported_input_extensions;
use crate::metadata;
use crate::types::ImageEntry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source folder not found: {0}")]
    SourceNotFound(PathBuf),
}

pub fn scan(source: &Path, settings: &GallerySettings) -> Result<Vec<ImageEntry>, ScanError> {
    if !source.is_dir() {
        return Err(ScanError::SourceNotFound(source.to_path_buf()));
    }

    collect_images(source)?
        .into_iter()
        .map(|path| build_entry(path, settings))
        .collect()
}

/// Only entries taking part in the gallery.
pub fn exported(entries: &[ImageEntry]) -> Vec<ImageEntry> {
    entries.iter().filter(|e| e.export).cloned().collect()
}

fn collect_images(source: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut images: Vec<PathBuf> = fs::read_dir(source)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let hidden = p
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true);
            !hidden && is_image(p)
        })
        .collect();

    images.sort();
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}

fn build_entry(path: PathBuf, settings: &GallerySettings) -> Result<ImageEntry, ScanError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let (created, len) = metadata::file_details(&path)?;

    let sidecar = metadata::read_sidecar(&path);
    let footer = metadata::resolve(&[
        settings.captions.get(&filename).map(String::as_str),
        sidecar.as_deref(),
    ])
    .unwrap_or_default();

    let export = !settings.exclude.contains(&filename);

    Ok(ImageEntry {
        filename,
        path,
        created,
        len,
        footer,
        export,
    })
}
