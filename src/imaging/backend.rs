//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the gallery pipeline and
//! pixel work. It has two operations: identify (read native dimensions) and
//! resize (decode, resample, encode to the output path).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::ResizeParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Cell size used when no thumbnail size was computed for an image.
    pub const FALLBACK: Dimensions = Dimensions::new(400, 300);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_zero(self) -> bool {
        self.width == 0 && self.height == 0
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Read the native pixel dimensions of an image.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize `params.source` to exactly `params.width` x `params.height`
    /// and write the result to `params.output`.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
