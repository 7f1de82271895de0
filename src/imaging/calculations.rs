//! Pure calculation functions for thumbnail dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Derived dimensions are truncated toward zero, never rounded: a 3000x2000
//! original scaled to width 200 gets height 133, not 133.33 rounded. Existing
//! galleries were laid out with this rule, so it must not change.

use super::backend::Dimensions;
use thiserror::Error;

/// A resize target with both sides zero.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("thumbnail width and height are both 0")]
pub struct InvalidDimension;

/// Whether a requested thumbnail size should be derived from the original's
/// aspect ratio.
///
/// True when `keep_ratio` is set, or when exactly one side was requested.
/// Note that `calculate_thumbnail_size` only derives a side that is zero: with
/// both sides given the exact box wins even if `keep_ratio` is set.
pub fn ratio_lock_applies(requested: Dimensions, keep_ratio: bool) -> bool {
    keep_ratio || ((requested.width == 0) != (requested.height == 0))
}

/// Calculate the thumbnail size for an image.
///
/// - both sides requested: the exact box
/// - width only: `height = original.height / original.width * width`
/// - height only: `width = original.width / original.height * height`
///
/// # Examples
/// ```
/// # use picture_table::imaging::{Dimensions, calculate_thumbnail_size};
/// let size = calculate_thumbnail_size(Dimensions::new(1024, 768), Dimensions::new(300, 0));
/// assert_eq!(size, Ok(Dimensions::new(300, 225)));
/// ```
pub fn calculate_thumbnail_size(
    original: Dimensions,
    requested: Dimensions,
) -> Result<Dimensions, InvalidDimension> {
    if requested.is_zero() {
        return Err(InvalidDimension);
    }

    let mut width = requested.width as f64;
    let mut height = requested.height as f64;

    if requested.width != 0 && requested.height == 0 {
        height = scale(original.height, original.width, requested.width);
    } else if requested.width == 0 && requested.height != 0 {
        width = scale(original.width, original.height, requested.height);
    }

    Ok(Dimensions::new(width as u32, height as u32))
}

/// `numerator / denominator * target`, zero for a degenerate original.
fn scale(numerator: u32, denominator: u32, target: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * target as f64
}

/// Fill in the missing side of a requested size from a fixed aspect preset.
///
/// Integer arithmetic throughout: `width / aspect_w * aspect_h`. A width of
/// 100 at 16:9 gives `100 / 16 * 9 = 54`. When both sides are set the width
/// drives the height.
pub fn calculate_preset_size(aspect: (u32, u32), requested: Dimensions) -> Dimensions {
    let (aspect_w, aspect_h) = aspect;
    if aspect_w == 0 || aspect_h == 0 {
        return requested;
    }

    if requested.width != 0 {
        Dimensions::new(requested.width, requested.width / aspect_w * aspect_h)
    } else if requested.height != 0 {
        Dimensions::new(requested.height / aspect_h * aspect_w, requested.height)
    } else {
        requested
    }
}
