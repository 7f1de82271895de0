//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take
//! a thumbnail request, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{InvalidDimension, calculate_thumbnail_size, ratio_lock_applies};
use super::params::{Quality, ResizeParams};
use std::path::Path;
use thiserror::Error;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ThumbnailError>;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    InvalidDimension(#[from] InvalidDimension),
}

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Dimensions> {
    Ok(backend.identify(path)?)
}

/// Requested thumbnail size and encoding settings for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailConfig {
    /// Requested box; a zero side is derived from the original.
    pub size: Dimensions,
    pub keep_ratio: bool,
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            size: Dimensions::new(200, 0),
            keep_ratio: false,
            quality: Quality::default(),
        }
    }
}

/// Decide the output size of one thumbnail.
///
/// The original is only decoded when the ratio lock applies; an exact box
/// needs no knowledge of the source.
pub fn plan_thumbnail_size(
    backend: &impl ImageBackend,
    source: &Path,
    config: &ThumbnailConfig,
) -> Result<Dimensions> {
    if config.size.is_zero() {
        return Err(InvalidDimension.into());
    }
    if !ratio_lock_applies(config.size, config.keep_ratio) {
        return Ok(config.size);
    }
    let original = get_dimensions(backend, source)?;
    Ok(calculate_thumbnail_size(original, config.size)?)
}

/// Create a thumbnail named like its source inside `output_dir`.
///
/// Returns the size the thumbnail was written at.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    config: &ThumbnailConfig,
) -> Result<Dimensions> {
    let size = plan_thumbnail_size(backend, source, config)?;
    let file_name = source.file_name().ok_or_else(|| {
        BackendError::ProcessingFailed(format!("No file name in {}", source.display()))
    })?;

    backend.resize(&ResizeParams {
        source: source.to_path_buf(),
        output: output_dir.join(file_name),
        width: size.width,
        height: size.height,
        quality: config.quality,
    })?;

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::new().with_image("test.jpg", 1920, 1080);

        let dims = get_dimensions(&backend, Path::new("/test.jpg")).unwrap();
        assert_eq!(dims, Dimensions::new(1920, 1080));
    }

    #[test]
    fn exact_box_skips_identify() {
        let backend = MockBackend::new();
        let config = ThumbnailConfig {
            size: Dimensions::new(120, 90),
            ..ThumbnailConfig::default()
        };

        let size = plan_thumbnail_size(&backend, Path::new("/a.jpg"), &config).unwrap();
        assert_eq!(size, Dimensions::new(120, 90));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn width_only_identifies_and_derives() {
        let backend = MockBackend::new().with_image("a.jpg", 1000, 500);

        let size =
            plan_thumbnail_size(&backend, Path::new("/a.jpg"), &ThumbnailConfig::default())
                .unwrap();
        assert_eq!(size, Dimensions::new(200, 100));
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Identify("/a.jpg".to_string())]
        );
    }

    #[test]
    fn zero_request_is_invalid() {
        let backend = MockBackend::new();
        let config = ThumbnailConfig {
            size: Dimensions::new(0, 0),
            ..ThumbnailConfig::default()
        };
        let result = plan_thumbnail_size(&backend, Path::new("/a.jpg"), &config);
        assert!(matches!(result, Err(ThumbnailError::InvalidDimension(_))));
    }

    #[test]
    fn create_thumbnail_keeps_file_name() {
        let backend = MockBackend::new().with_image("dawn.png", 600, 400);
        let config = ThumbnailConfig {
            quality: Quality::new(70),
            ..ThumbnailConfig::default()
        };

        let size = create_thumbnail(
            &backend,
            Path::new("/photos/dawn.png"),
            Path::new("/photos/thumbnails"),
            &config,
        )
        .unwrap();
        assert_eq!(size, Dimensions::new(200, 133));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(
            ops[1],
            RecordedOp::Resize {
                source: "/photos/dawn.png".to_string(),
                output: "/photos/thumbnails/dawn.png".to_string(),
                width: 200,
                height: 133,
                quality: 70,
            }
        );
    }

    #[test]
    fn create_thumbnail_propagates_backend_failure() {
        let backend = MockBackend::new().failing("bad.jpg");
        let result = create_thumbnail(
            &backend,
            Path::new("/p/bad.jpg"),
            Path::new("/p/thumbnails"),
            &ThumbnailConfig::default(),
        );
        assert!(matches!(result, Err(ThumbnailError::Backend(_))));
    }
}
