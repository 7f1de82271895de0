//! Page generation and run orchestration.
//!
//! Last stage of a gallery run, and the entry point that drives the others:
//!
//! ```text
//! scan  ->  plan_thumbnails  ->  build_table  ->  create_archive  ->  assemble_page
//!           (if enabled)                          (if enabled)
//! ```
//!
//! ## Template
//!
//! The page is `static/page.html`, embedded at compile time, with literal
//! placeholders:
//!
//! | Placeholder | Value |
//! |---|---|
//! | `[TITLE]` | Header text, HTML-escaped |
//! | `[BACKGROUND]`, `[FOREGROUND]` | `#RRGGBB` |
//! | `[ARCHIVE]` | Download notice, or nothing |
//! | `[TABLE]` | Table rows from [`crate::layout`] |
//! | `[COPYRIGHT]` | Generator line with timestamp |
//!
//! Substitution is a single pass over the template, so substituted values
//! are never scanned for placeholders themselves.
//!
//! ## Errors
//!
//! [`run`] is the outermost boundary of a run: whatever fails is reported on
//! the event channel as an error message, then returned.

use crate::archive::{self, archive_notice, normalize_archive_name};
use crate::config::{GallerySettings, Rgb};
use crate::events::Reporter;
use crate::imaging::ImageBackend;
use crate::layout::{self, LayoutError, TableOptions};
use crate::process::{self, ProcessError};
use crate::scan::{self, ScanError};
use crate::types::{ImageEntry, SizeIndex};
use chrono::{DateTime, Local};
use maud::html;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

const TEMPLATE: &str = include_str!("../static/page.html");

/// File name of the generated page inside the source folder.
pub const INDEX_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source folder not found: {0}")]
    SourceNotFound(PathBuf),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("Page was not written: {0}")]
    NotWritten(PathBuf),
}

/// Values substituted into the page template.
#[derive(Debug, Clone)]
pub struct PageParts<'a> {
    pub title: &'a str,
    pub table: &'a str,
    /// Empty when no archive was built.
    pub archive_notice: &'a str,
    pub background: Rgb,
    pub foreground: Rgb,
    pub generated_at: DateTime<Local>,
}

/// The finished page and where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryPage {
    pub path: PathBuf,
    pub html: String,
}

impl GalleryPage {
    /// Write the page, replacing any previous one.
    pub fn write(&self) -> Result<(), GenerateError> {
        fs::write(&self.path, &self.html)?;
        Ok(())
    }
}

/// Fill the page template.
pub fn assemble_page(parts: &PageParts) -> String {
    let title = html! { (parts.title) }.into_string();
    let background = parts.background.to_hex();
    let foreground = parts.foreground.to_hex();
    let copyright = format!(
        "Created with picture-table {} on {}",
        env!("CARGO_PKG_VERSION"),
        parts.generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    substitute(
        TEMPLATE,
        &[
            ("[TITLE]", &title),
            ("[BACKGROUND]", &background),
            ("[FOREGROUND]", &foreground),
            ("[ARCHIVE]", parts.archive_notice),
            ("[TABLE]", parts.table),
            ("[COPYRIGHT]", &copyright),
        ],
    )
}

fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('[') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('[');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Build and write the page for already scanned `entries`.
///
/// Entries with `export = false` are left out. A failing archive is
/// reported and the page is written without the download notice.
pub fn generate(
    backend: &impl ImageBackend,
    settings: &GallerySettings,
    entries: &[ImageEntry],
    reporter: &Reporter,
) -> Result<GalleryPage, GenerateError> {
    let source = settings.source.as_path();
    if !source.is_dir() {
        return Err(GenerateError::SourceNotFound(source.to_path_buf()));
    }
    let images = scan::exported(entries);
    info!(source = %source.display(), images = images.len(), "generating gallery");

    let sizes = if settings.thumbnails.enabled {
        let request = settings.thumbnails.to_thumbnail_config();
        process::plan_thumbnails(backend, source, &images, &request, reporter)?
    } else {
        SizeIndex::new()
    };

    let options = TableOptions {
        columns: settings.layout.columns,
        new_tab: settings.layout.new_tab,
        footer: settings.layout.footer,
        thumbnails: settings.thumbnails.enabled,
    };
    let table = layout::build_table(backend, &images, &sizes, &options, reporter)?;

    let notice = if settings.archive.enabled {
        build_archive_notice(source, &settings.archive.name, &images, reporter)
    } else {
        String::new()
    };

    let html = assemble_page(&PageParts {
        title: &settings.header,
        table: &table,
        archive_notice: &notice,
        background: settings.colors.background,
        foreground: settings.colors.foreground,
        generated_at: Local::now(),
    });
    let page = GalleryPage {
        path: source.join(INDEX_FILE),
        html,
    };

    reporter.info("Write data into file.");
    page.write()?;
    if !page.path.exists() {
        reporter.error("Can't create file.");
        return Err(GenerateError::NotWritten(page.path));
    }
    reporter.info("File created.");
    info!(path = %page.path.display(), "page written");

    Ok(page)
}

fn build_archive_notice(
    source: &Path,
    name: &str,
    images: &[ImageEntry],
    reporter: &Reporter,
) -> String {
    match archive::create_archive(source, name, images, reporter) {
        Ok(_) => archive_notice(&normalize_archive_name(name)).into_string(),
        Err(e) => {
            warn!(error = %e, "archive failed");
            reporter.error(format!("Can't create archive: {e}"));
            String::new()
        }
    }
}

/// Scan the source folder and generate its page.
///
/// Any failure is reported on the event channel before it is returned.
/// When `open_page` is set the written page is handed to the system viewer.
pub fn run(
    backend: &impl ImageBackend,
    settings: &GallerySettings,
    reporter: &Reporter,
) -> Result<GalleryPage, GenerateError> {
    let result = scan::scan(&settings.source, settings)
        .map_err(GenerateError::from)
        .and_then(|entries| generate(backend, settings, &entries, reporter));

    match result {
        Ok(page) => {
            if settings.open_page {
                if let Err(e) = open_in_viewer(&page.path) {
                    warn!(error = %e, "could not open page");
                    reporter.error(format!("Can't open {}: {e}", page.path.display()));
                }
            }
            Ok(page)
        }
        Err(e) => {
            error!(error = %e, "gallery run failed");
            reporter.error(format!("An error has occurred. Message: {e}"));
            Err(e)
        }
    }
}

/// Hand a file to the platform's default viewer without waiting for it.
pub fn open_in_viewer(path: &Path) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else {
        std::process::Command::new("xdg-open")
    };
    command.arg(path).spawn()?;
    Ok(())
}
