//! # Picture Table
//!
//! Turns a folder of images into a single static HTML page: an image table
//! with a configurable column count, optional thumbnails, a footer under each
//! image and an optional "download all" archive.
//!
//! # Architecture: One Sequential Run
//!
//! A run processes the images one at a time, in file-name order:
//!
//! ```text
//! 1. Scan       photos/         ->  Vec<ImageEntry>   (folder -> entries)
//! 2. Thumbnail  entries         ->  SizeIndex         (photos/thumbnails/*)
//! 3. Layout     entries + sizes ->  table rows        (HTML string)
//! 4. Archive    entries         ->  photos/<name>.zip (optional)
//! 5. Assemble   rows + settings ->  photos/index.html
//! ```
//!
//! Every stage reports through an [`events::Reporter`]: one progress update
//! and one info message per image, in processing order. The caller owns the
//! receiving end of the channel; the CLI prints it from a separate thread.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Lists the images in the source folder as [`types::ImageEntry`] values |
//! | [`process`] | Writes thumbnails and records their sizes in a [`types::SizeIndex`] |
//! | [`layout`] | Builds the table rows and renders the per-image footers |
//! | [`archive`] | Bundles the originals into a ZIP file and renders the download notice |
//! | [`generate`] | Fills the page template and drives a whole run |
//! | [`config`] | `picture-table.toml` / JSON settings loading, merging, and validation |
//! | [`events`] | Progress and info events sent during a run |
//! | [`metadata`] | File details and caption resolution (settings, sidecar files) |
//! | [`imaging`] | Size calculations and the pure-Rust decode/resize backend |
//! | [`types`] | Shared types (`ImageEntry`, `SizeIndex`, `FooterKind`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Truncating Size Math
//!
//! A derived thumbnail side is truncated toward zero, never rounded. A
//! 1000x333 original asked for width 200 gets a 200x66 thumbnail. Galleries
//! built by earlier versions keep their exact pixel sizes.
//!
//! ## Exact Box Wins Over Keep-Ratio
//!
//! When both width and height are requested the thumbnail is exactly that
//! box, even with `keep_ratio` set. The ratio lock only derives a side that
//! was left at zero. See [`imaging::ratio_lock_applies`].
//!
//! ## Broken Images Do Not Stop a Run
//!
//! A file that fails to decode is reported and skipped by the thumbnail
//! stage. Its cell still links the original, at the fallback size of
//! 400x300. This holds for the thumbnail stage only: the `file_details`
//! footer reads each image's dimensions while building the table, and an
//! unreadable image there aborts the run before `index.html` is written.
//!
//! ## Maud for Fragments, a Template for the Page
//!
//! Cells, footers and the archive notice are built with
//! [Maud](https://maud.lambda.xyz/), so file names are escaped. The page
//! around them is a static template with literal placeholders, embedded at
//! compile time.

pub mod archive;
pub mod config;
pub mod events;
pub mod generate;
pub mod imaging;
pub mod layout;
pub mod metadata;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
