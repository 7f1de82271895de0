//! Shared types used across all pipeline stages.

use crate::imaging::Dimensions;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Computed thumbnail size per image file name.
///
/// A missing key means "use [`Dimensions::FALLBACK`]".
pub type SizeIndex = HashMap<String, Dimensions>;

/// One image discovered in the source folder.
///
/// Created by the scan stage; the list of entries is fixed for the duration
/// of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// File name, used as the key in [`SizeIndex`] and as the link target.
    pub filename: String,
    /// Absolute path of the original.
    pub path: PathBuf,
    /// Creation time (modification time where the filesystem has no birth time).
    pub created: DateTime<Local>,
    /// File size in bytes.
    pub len: u64,
    /// Free-text caption shown by [`FooterKind::Custom`].
    pub footer: String,
    /// Whether the image takes part in the gallery.
    pub export: bool,
}

/// What is rendered beneath each image.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum FooterKind {
    #[default]
    Nothing,
    /// The file name.
    ImageName,
    /// `{position} of {total}`.
    Numbering,
    /// File name, date, pixel size and file size in a small table.
    FileDetails,
    /// The image's caption, verbatim.
    Custom,
}
