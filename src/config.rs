//! Gallery settings.
//!
//! Handles loading, validating, and merging the settings file. Every key is
//! optional: stock defaults are overridden by whatever the file sets.
//!
//! ## Settings File Location
//!
//! By default settings are read from `picture-table.toml` inside the source
//! folder. An explicit file can be passed with `--config`; it may be TOML or
//! JSON. Both use the same keys and sections.
//!
//! ```text
//! photos/
//! ├── picture-table.toml    # Settings (optional)
//! ├── dawn.jpg
//! ├── dawn.txt              # Caption for dawn.jpg (optional)
//! └── dusk.png
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! header = "Picture gallery"  # Page title and heading
//! open_page = false           # Open index.html when done
//! exclude = []                # File names left out of the gallery
//!
//! [thumbnails]
//! enabled = true
//! width = 200                 # 0 = derive from height
//! height = 0                  # 0 = derive from width
//! keep_ratio = false          # Derive a side even when both are set
//! ratio = "custom"            # "custom", "4:3", "16:9" or "16:10"
//! quality = 90                # JPEG quality (1-100)
//!
//! [layout]
//! columns = 3
//! new_tab = false             # Open originals in a new tab
//! footer = "nothing"          # nothing, image_name, numbering, file_details, custom
//!
//! [archive]
//! enabled = false
//! name = "gallery"            # Spaces become underscores, .zip is appended
//!
//! [colors]
//! background = "#000000"
//! foreground = "#FFFFFF"
//!
//! [captions]
//! "dawn.jpg" = "First light over the bay"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dimensions, Quality, ThumbnailConfig, calculate_preset_size};
use crate::types::FooterKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the settings file looked up in the source folder.
pub const SETTINGS_FILE: &str = "picture-table.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported settings file (expected .toml or .json): {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full settings snapshot for one gallery run.
///
/// All fields have defaults. The pipeline treats the settings as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GallerySettings {
    /// Folder holding the images; `index.html` is written here.
    pub source: PathBuf,
    /// Page title and heading.
    pub header: String,
    /// Open the page in the system viewer after a successful run.
    pub open_page: bool,
    pub thumbnails: ThumbnailsConfig,
    pub layout: LayoutConfig,
    pub archive: ArchiveConfig,
    pub colors: ColorConfig,
    /// File names left out of the gallery.
    pub exclude: Vec<String>,
    /// Per-image captions keyed by file name.
    pub captions: BTreeMap<String, String>,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            header: "Picture gallery".to_string(),
            open_page: false,
            thumbnails: ThumbnailsConfig::default(),
            layout: LayoutConfig::default(),
            archive: ArchiveConfig::default(),
            colors: ColorConfig::default(),
            exclude: Vec::new(),
            captions: BTreeMap::new(),
        }
    }
}

impl GallerySettings {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.columns == 0 {
            return Err(ConfigError::Validation(
                "layout.columns must be at least 1".into(),
            ));
        }
        if self.thumbnails.enabled && self.thumbnails.requested_size().is_zero() {
            return Err(ConfigError::Validation(
                "thumbnails.width and thumbnails.height must not both be 0".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.archive.enabled && self.archive.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "archive.name must not be empty when the archive is enabled".into(),
            ));
        }
        Ok(())
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub enabled: bool,
    /// Requested width; 0 means "derive from height".
    pub width: u32,
    /// Requested height; 0 means "derive from width".
    pub height: u32,
    pub keep_ratio: bool,
    /// Fixed aspect preset. Anything but `custom` disables `keep_ratio`.
    pub ratio: AspectPreset,
    /// JPEG encoding quality for thumbnails of JPEG originals.
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 200,
            height: 0,
            keep_ratio: false,
            ratio: AspectPreset::Custom,
            quality: 90,
        }
    }
}

impl ThumbnailsConfig {
    /// Requested box after applying the aspect preset.
    pub fn requested_size(&self) -> Dimensions {
        let requested = Dimensions::new(self.width, self.height);
        match self.ratio.ratio() {
            Some(aspect) => calculate_preset_size(aspect, requested),
            None => requested,
        }
    }

    /// `keep_ratio` only counts for the custom preset.
    pub fn effective_keep_ratio(&self) -> bool {
        self.keep_ratio && self.ratio == AspectPreset::Custom
    }

    pub fn to_thumbnail_config(&self) -> ThumbnailConfig {
        ThumbnailConfig {
            size: self.requested_size(),
            keep_ratio: self.effective_keep_ratio(),
            quality: Quality::new(self.quality),
        }
    }
}

/// Fixed thumbnail aspect ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectPreset {
    #[default]
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "4:3")]
    FourToThree,
    #[serde(rename = "16:9")]
    SixteenToNine,
    #[serde(rename = "16:10")]
    SixteenToTen,
}

impl AspectPreset {
    /// `(width, height)` of the preset, `None` for custom.
    pub fn ratio(self) -> Option<(u32, u32)> {
        match self {
            AspectPreset::Custom => None,
            AspectPreset::FourToThree => Some((4, 3)),
            AspectPreset::SixteenToNine => Some((16, 9)),
            AspectPreset::SixteenToTen => Some((16, 10)),
        }
    }
}

/// Table layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Images per table row.
    pub columns: usize,
    /// Open the linked original in a new tab.
    pub new_tab: bool,
    pub footer: FooterKind,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            new_tab: false,
            footer: FooterKind::Nothing,
        }
    }
}

/// Download archive settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    pub enabled: bool,
    /// Archive name before normalization.
    pub name: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: "gallery".to_string(),
        }
    }
}

/// Page colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: Rgb,
    pub foreground: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: Rgb::new(0, 0, 0),
            foreground: Rgb::new(255, 255, 255),
        }
    }
}

/// An opaque color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Validation(format!("invalid color '{s}', expected #RRGGBB"));
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GallerySettings::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load the settings file of a source folder as a raw TOML value.
///
/// Returns `Ok(None)` if the folder has no settings file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(SETTINGS_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GallerySettings, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: GallerySettings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings for a source folder.
///
/// Reads `picture-table.toml` from the folder if present. The folder itself
/// always becomes `source`, whatever the file says.
pub fn load_settings(source: &Path) -> Result<GallerySettings, ConfigError> {
    let mut settings = resolve_config(load_raw_config(source)?)?;
    settings.source = source.to_path_buf();
    Ok(settings)
}

/// Load settings from an explicit `.toml` or `.json` file.
///
/// A relative `source` is resolved against the directory holding the file.
pub fn load_settings_file(path: &Path) -> Result<GallerySettings, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let content = fs::read_to_string(path)?;

    let mut settings = match extension.as_deref() {
        Some("toml") => resolve_config(Some(toml::from_str(&content)?))?,
        Some("json") => {
            let settings: GallerySettings = serde_json::from_str(&content)?;
            settings.validate()?;
            settings
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    if settings.source.is_relative() {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        settings.source = base.join(&settings.source);
    }
    Ok(settings)
}

/// Returns a fully-commented stock settings file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# picture-table settings
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the image folder as picture-table.toml, or pass it
# explicitly with --config. Unknown keys will cause an error.

# Page title and heading.
header = "Picture gallery"

# Open index.html in the default viewer when the build succeeds.
open_page = false

# File names to leave out of the gallery (and the archive).
exclude = []

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Write resized copies into thumbnails/ and show those in the table.
enabled = true

# Requested size in pixels. Set one side to 0 to derive it from the
# original's aspect ratio. Both 0 is an error.
width = 200
height = 0

# Lock the original's aspect ratio when deriving a side. When both width
# and height are set the exact box is used anyway.
# Only used with ratio = "custom".
keep_ratio = false

# Fixed aspect preset: "custom", "4:3", "16:9" or "16:10".
# A preset derives the missing side from the one given.
ratio = "custom"

# JPEG quality for thumbnails of JPEG originals (1-100).
quality = 90

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# Images per table row.
columns = 3

# Open the full-size image in a new tab.
new_tab = false

# Text under each image:
#   nothing | image_name | numbering | file_details | custom
# "custom" shows the [captions] entry or the sidecar .txt file.
footer = "nothing"

# ---------------------------------------------------------------------------
# Download archive
# ---------------------------------------------------------------------------
[archive]
# Bundle all images into a zip file and link it from the page.
enabled = false

# Spaces become underscores and .zip is appended when missing.
name = "gallery"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#000000"
foreground = "#FFFFFF"

# ---------------------------------------------------------------------------
# Captions (used by footer = "custom")
# ---------------------------------------------------------------------------
[captions]
# "dawn.jpg" = "First light over the bay"
"##
}
