//! Image metadata resolution.
//!
//! ## File details
//!
//! Creation time and byte length come from the filesystem. Filesystems that
//! do not record a birth time (many Linux setups) fall back to the
//! modification time.
//!
//! ## Captions
//!
//! The caption of an image (shown by the custom footer) has two sources:
//!
//! - a `[captions]` entry in the settings file, keyed by file name
//! - a sidecar text file with the same stem: `dawn.txt` next to `dawn.jpg`
//!
//! The first non-empty value wins, in that order.

use chrono::{DateTime, Local};
use std::path::Path;

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value.
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Read a sidecar `.txt` file for an image.
///
/// Given `photos/dawn.jpg`, looks for `photos/dawn.txt` and returns its
/// trimmed contents. Returns `None` if the file doesn't exist or is empty.
pub fn read_sidecar(image_path: &Path) -> Option<String> {
    let sidecar = image_path.with_extension("txt");
    std::fs::read_to_string(sidecar)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Creation time and byte length of a file.
pub fn file_details(path: &Path) -> std::io::Result<(DateTime<Local>, u64)> {
    let meta = std::fs::metadata(path)?;
    let created = meta.created().or_else(|_| meta.modified())?;
    Ok((DateTime::<Local>::from(created), meta.len()))
}
