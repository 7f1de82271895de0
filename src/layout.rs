//! Gallery table layout.
//!
//! Third stage of a gallery run. Turns the ordered image list into the rows
//! of an HTML table, `columns` cells per row. Each cell links the original
//! and shows either its thumbnail or the original scaled in the browser,
//! followed by the configured footer.
//!
//! ```text
//! <tr>
//! <td><a href="a.jpg"><img src="thumbnails/a.jpg" width="200" height="133" ...></a><br>1 of 7</td>
//! <td>...</td>
//! <td>...</td>
//! </tr>
//! <tr>
//! <td>...</td>       <- last row, no closing </tr>
//! ```
//!
//! A partial last row gets no closing `</tr>`. Browsers close it when the
//! table ends, and existing galleries were produced that way.

use crate::events::Reporter;
use crate::imaging::{BackendError, Dimensions, ImageBackend};
use crate::process::THUMBNAIL_DIR;
use crate::types::{FooterKind, ImageEntry, SizeIndex};
use maud::{Markup, PreEscaped, html};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Image entry has no file name: {0}")]
    MissingImage(PathBuf),
    #[error("Failed to read {filename}: {source}")]
    Decode {
        filename: String,
        #[source]
        source: BackendError,
    },
}

/// Table rendering options taken from the settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableOptions {
    pub columns: usize,
    pub new_tab: bool,
    pub footer: FooterKind,
    /// Whether a thumbnail run happened; cells fall back to the original
    /// for images missing from the size index either way.
    pub thumbnails: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            columns: 3,
            new_tab: false,
            footer: FooterKind::Nothing,
            thumbnails: false,
        }
    }
}

/// Build the table rows for `images`, in the order given.
///
/// Emits one progress update and one info message per image.
pub fn build_table(
    backend: &impl ImageBackend,
    images: &[ImageEntry],
    sizes: &SizeIndex,
    options: &TableOptions,
    reporter: &Reporter,
) -> Result<String, LayoutError> {
    let columns = options.columns.max(1);
    let total = images.len();
    let mut table = String::new();

    for (i, entry) in images.iter().enumerate() {
        if entry.filename.is_empty() {
            return Err(LayoutError::MissingImage(entry.path.clone()));
        }

        reporter.progress(i + 1, total);
        reporter.info(format!("Create image entry {} of {}", i + 1, total));

        if i % columns == 0 {
            table.push_str("<tr>\n");
        }
        let cell = render_cell(backend, entry, sizes, options, i + 1, total)?;
        table.push_str(&cell.into_string());
        table.push('\n');
        if (i + 1) % columns == 0 {
            table.push_str("</tr>\n");
        }
    }

    Ok(table)
}

fn render_cell(
    backend: &impl ImageBackend,
    entry: &ImageEntry,
    sizes: &SizeIndex,
    options: &TableOptions,
    position: usize,
    total: usize,
) -> Result<Markup, LayoutError> {
    let size = sizes
        .get(&entry.filename)
        .copied()
        .unwrap_or(Dimensions::FALLBACK);
    let src = image_src(entry, sizes, options.thumbnails);
    let footer = render_footer(backend, entry, options.footer, position, total)?;

    Ok(html! {
        td {
            a href=(entry.filename) target=[options.new_tab.then_some("_blank")] {
                img src=(src) width=(size.width) height=(size.height)
                    alt=(entry.filename) title=(entry.filename);
            }
            (footer)
        }
    })
}

/// Page-relative image source: the thumbnail when one was written, else the original.
pub fn image_src(entry: &ImageEntry, sizes: &SizeIndex, thumbnails: bool) -> String {
    if thumbnails && sizes.contains_key(&entry.filename) {
        format!("{THUMBNAIL_DIR}/{}", entry.filename)
    } else {
        entry.filename.clone()
    }
}

/// Render the footer shown beneath one image.
///
/// Only [`FooterKind::FileDetails`] touches the backend, to read pixel size.
pub fn render_footer(
    backend: &impl ImageBackend,
    image: &ImageEntry,
    kind: FooterKind,
    position: usize,
    total: usize,
) -> Result<Markup, LayoutError> {
    let markup = match kind {
        FooterKind::Nothing => html! {},
        FooterKind::ImageName => html! { br; (image.filename) },
        FooterKind::Numbering => html! { br; (position) " of " (total) },
        FooterKind::FileDetails => {
            let size = backend
                .identify(&image.path)
                .map_err(|source| LayoutError::Decode {
                    filename: image.filename.clone(),
                    source,
                })?;
            html! { br; (file_details(image, size)) }
        }
        FooterKind::Custom => html! { br; (PreEscaped(image.footer.as_str())) },
    };
    Ok(markup)
}

fn file_details(image: &ImageEntry, size: Dimensions) -> Markup {
    html! {
        table border="0" cellspacing="0" cellpadding="3" {
            tr { td align="right" { "File:" } td { (image.filename) } }
            tr { td align="right" { "Date:" } td { (image.created.format("%x %X").to_string()) } }
            tr { td align="right" { "Size:" } td { (size.to_string()) } }
            tr { td align="right" { "File size:" } td { (format!("{:.2} MB", megabytes(image.len))) } }
        }
    }
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
