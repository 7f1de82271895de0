//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Thumbnail** | `resize_exact` (bicubic) + re-encode in the source format |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    InvalidDimension, calculate_preset_size, calculate_thumbnail_size, ratio_lock_applies,
};
pub use operations::{ThumbnailConfig, ThumbnailError, create_thumbnail, get_dimensions};
pub use params::{Quality, ResizeParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
