//! Shared test utilities for the picture-table test suite.
//!
//! Provides synthetic image writers, entry builders, an event recorder and
//! counters for the generated table markup.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (reporter, rx) = recording_reporter();
//! let html = build_table(&backend, &[entry("a.jpg")], &sizes, &options, &reporter)?;
//!
//! assert_eq!(count_row_markers(&html), (1, 0));
//! assert_eq!(count_cells(&html), 1);
//! assert_eq!(progress_values(&drain(&rx)), vec![100.0]);
//! ```

use crate::events::{Event, InfoLevel, Reporter};
use crate::types::ImageEntry;
use chrono::{Local, TimeZone};
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    })
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, ImageFormat::Bmp)
        .unwrap();
}

// =========================================================================
// Entries
// =========================================================================

/// An exported entry under `/photos` with fixed metadata.
pub fn entry(name: &str) -> ImageEntry {
    entry_in(Path::new("/photos"), name)
}

/// An exported entry for `dir/name`. The file is not created.
pub fn entry_in(dir: &Path, name: &str) -> ImageEntry {
    ImageEntry {
        filename: name.to_string(),
        path: dir.join(name),
        created: Local.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
        len: 0,
        footer: String::new(),
        export: true,
    }
}

// =========================================================================
// Events
// =========================================================================

pub fn recording_reporter() -> (Reporter, Receiver<Event>) {
    let (tx, rx) = mpsc::channel();
    (Reporter::new(tx), rx)
}

/// Everything sent so far, without blocking.
pub fn drain(rx: &Receiver<Event>) -> Vec<Event> {
    rx.try_iter().collect()
}

pub fn messages(events: &[Event], level: InfoLevel) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Info { level: l, message } if *l == level => Some(message.clone()),
            _ => None,
        })
        .collect()
}

pub fn progress_values(events: &[Event]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Progress { current, .. } => Some(*current),
            _ => None,
        })
        .collect()
}

// =========================================================================
// Table markup
// =========================================================================

/// `(opening, closing)` row markers, each on its own line.
pub fn count_row_markers(html: &str) -> (usize, usize) {
    let open = html.lines().filter(|l| l.trim() == "<tr>").count();
    let close = html.lines().filter(|l| l.trim() == "</tr>").count();
    (open, close)
}

/// Number of image cells.
pub fn count_cells(html: &str) -> usize {
    html.matches("<td><a ").count()
}
