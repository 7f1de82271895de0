//! Thumbnail planning.
//!
//! Second stage of a gallery run. Walks the image list in order, works out
//! each thumbnail's size, writes the resized copy into `thumbnails/` and
//! records the size in a [`SizeIndex`] for the layout stage.
//!
//! ## Output Structure
//!
//! ```text
//! photos/
//! ├── dawn.jpg
//! ├── dusk.png
//! └── thumbnails/
//!     ├── dawn.jpg      # Same name, same format, resized
//!     └── dusk.png
//! ```
//!
//! ## Failures
//!
//! A request with both sides zero is rejected before any image is touched.
//! After that a broken image never aborts the run: it is reported as an
//! error event, left out of the index, and planning moves on.

use crate::events::Reporter;
use crate::imaging::{ImageBackend, InvalidDimension, ThumbnailConfig, create_thumbnail};
use crate::types::{ImageEntry, SizeIndex};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Subfolder of the source folder holding thumbnails.
pub const THUMBNAIL_DIR: &str = "thumbnails";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source folder not found: {0}")]
    SourceNotFound(PathBuf),
    #[error(transparent)]
    InvalidDimension(#[from] InvalidDimension),
}

pub fn thumbnail_dir(source: &Path) -> PathBuf {
    source.join(THUMBNAIL_DIR)
}

/// Create thumbnails for `images` and return their sizes by file name.
///
/// Emits one progress update and one info message per image, in list order.
pub fn plan_thumbnails(
    backend: &impl ImageBackend,
    source: &Path,
    images: &[ImageEntry],
    request: &ThumbnailConfig,
    reporter: &Reporter,
) -> Result<SizeIndex, ProcessError> {
    if !source.is_dir() {
        return Err(ProcessError::SourceNotFound(source.to_path_buf()));
    }
    if request.size.is_zero() {
        return Err(InvalidDimension.into());
    }

    let output_dir = thumbnail_dir(source);
    fs::create_dir_all(&output_dir)?;

    let total = images.len();
    let mut sizes = SizeIndex::with_capacity(total);

    for (i, entry) in images.iter().enumerate() {
        reporter.progress(i + 1, total);
        reporter.info(format!("Create thumbnail {} of {}", i + 1, total));

        match create_thumbnail(backend, &entry.path, &output_dir, request) {
            Ok(size) => {
                debug!(file = %entry.filename, %size, "thumbnail written");
                sizes.insert(entry.filename.clone(), size);
            }
            Err(e) => {
                warn!(file = %entry.filename, error = %e, "thumbnail skipped");
                reporter.error(format!("Skipped {}: {e}", entry.filename));
            }
        }
    }

    Ok(sizes)
}
