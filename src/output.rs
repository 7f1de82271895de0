//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Images
//! 001 dawn.jpg (1.50 MB)
//!     Caption: First light over the bay
//! 002 dusk.png (0.42 MB)
//! 003 private.jpg (excluded)
//!
//! Settings
//!     Columns: 3
//!     Footer: numbering
//!     Thumbnails: 200x0
//!     Archive: My_Photos.zip
//! ```
//!
//! ## Build
//!
//! Events from the run are printed as they arrive. Info lines carry the last
//! reported progress; errors are prefixed:
//!
//! ```text
//! [ 33.3%] Create thumbnail 1 of 3
//! error: Skipped broken.jpg: Failed to decode ...
//! [100.0%] Create image entry 3 of 3
//! [100.0%] Write data into file.
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::archive::normalize_archive_name;
use crate::config::GallerySettings;
use crate::events::{Event, InfoLevel};
use crate::generate::GalleryPage;
use crate::types::{FooterKind, ImageEntry};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn footer_label(kind: FooterKind) -> &'static str {
    match kind {
        FooterKind::Nothing => "nothing",
        FooterKind::ImageName => "image name",
        FooterKind::Numbering => "numbering",
        FooterKind::FileDetails => "file details",
        FooterKind::Custom => "custom",
    }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the images found in the source folder and the settings in effect.
pub fn format_scan_output(entries: &[ImageEntry], settings: &GallerySettings) -> Vec<String> {
    let mut lines = vec!["Images".to_string()];

    if entries.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, entry) in entries.iter().enumerate() {
        let detail = if entry.export {
            format!("{:.2} MB", entry.len as f64 / 1024.0 / 1024.0)
        } else {
            "excluded".to_string()
        };
        lines.push(format!("{} {} ({})", format_index(i + 1), entry.filename, detail));
        if !entry.footer.is_empty() {
            lines.push(format!("    Caption: {}", entry.footer));
        }
    }

    lines.push(String::new());
    lines.push("Settings".to_string());
    lines.push(format!("    Columns: {}", settings.layout.columns));
    lines.push(format!("    Footer: {}", footer_label(settings.layout.footer)));
    if settings.thumbnails.enabled {
        lines.push(format!(
            "    Thumbnails: {}",
            settings.thumbnails.requested_size()
        ));
    } else {
        lines.push("    Thumbnails: off".to_string());
    }
    if settings.archive.enabled {
        lines.push(format!(
            "    Archive: {}",
            normalize_archive_name(&settings.archive.name)
        ));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(entries: &[ImageEntry], settings: &GallerySettings) {
    for line in format_scan_output(entries, settings) {
        println!("{}", line);
    }
}

// ============================================================================
// Run events
// ============================================================================

/// Format one run event given the last progress value seen.
///
/// Progress events produce no line of their own.
pub fn format_event(event: &Event, last_progress: Option<f64>) -> Vec<String> {
    match event {
        Event::Progress { .. } => Vec::new(),
        Event::Info {
            level: InfoLevel::Error,
            message,
        } => vec![format!("error: {}", message)],
        Event::Info {
            level: InfoLevel::Info,
            message,
        } => match last_progress {
            Some(p) => vec![format!("[{:>5.1}%] {}", p, message)],
            None => vec![message.clone()],
        },
    }
}

/// Tracks progress between events so info lines can show it.
#[derive(Debug, Default)]
pub struct EventPrinter {
    last_progress: Option<f64>,
}

impl EventPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&mut self, event: &Event) -> Vec<String> {
        if let Event::Progress { current, .. } = event {
            self.last_progress = Some(*current);
        }
        format_event(event, self.last_progress)
    }

    pub fn print(&mut self, event: &Event) {
        for line in self.lines(event) {
            println!("{}", line);
        }
    }
}

// ============================================================================
// Build output
// ============================================================================

pub fn format_build_output(page: &GalleryPage) -> Vec<String> {
    vec![format!(
        "==> Gallery written \u{2192} {}",
        page.path.display()
    )]
}

pub fn print_build_output(page: &GalleryPage) {
    for line in format_build_output(page) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::entry;
    use std::path::PathBuf;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    // =========================================================================
    // Scan output
    // =========================================================================

    #[test]
    fn scan_output_lists_images_and_settings() {
        let mut dawn = entry("dawn.jpg");
        dawn.len = 1_572_864;
        dawn.footer = "First light".to_string();
        let mut private = entry("private.jpg");
        private.export = false;

        let mut settings = GallerySettings::default();
        settings.archive.enabled = true;
        settings.archive.name = "My Photos".to_string();

        let lines = format_scan_output(&[dawn, private], &settings);
        assert_eq!(
            lines,
            vec![
                "Images",
                "001 dawn.jpg (1.50 MB)",
                "    Caption: First light",
                "002 private.jpg (excluded)",
                "",
                "Settings",
                "    Columns: 3",
                "    Footer: nothing",
                "    Thumbnails: 200x0",
                "    Archive: My_Photos.zip",
            ]
        );
    }

    #[test]
    fn scan_output_empty_folder() {
        let mut settings = GallerySettings::default();
        settings.thumbnails.enabled = false;

        let lines = format_scan_output(&[], &settings);
        assert_eq!(lines[1], "    (none)");
        assert!(lines.contains(&"    Thumbnails: off".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Archive")));
    }

    // =========================================================================
    // Events
    // =========================================================================

    fn info(message: &str) -> Event {
        Event::Info {
            level: InfoLevel::Info,
            message: message.to_string(),
        }
    }

    fn progress(current: f64) -> Event {
        Event::Progress {
            current,
            max: 100.0,
        }
    }

    #[test]
    fn progress_alone_prints_nothing() {
        assert!(format_event(&progress(50.0), None).is_empty());
    }

    #[test]
    fn info_carries_last_progress() {
        assert_eq!(
            format_event(&info("Create thumbnail 1 of 3"), Some(100.0 / 3.0)),
            vec!["[ 33.3%] Create thumbnail 1 of 3"]
        );
        assert_eq!(format_event(&info("plain"), None), vec!["plain"]);
    }

    #[test]
    fn errors_are_prefixed() {
        let event = Event::Info {
            level: InfoLevel::Error,
            message: "Can't create file.".to_string(),
        };
        assert_eq!(
            format_event(&event, Some(10.0)),
            vec!["error: Can't create file."]
        );
    }

    #[test]
    fn printer_tracks_progress() {
        let mut printer = EventPrinter::new();

        assert_eq!(printer.lines(&info("before")), vec!["before"]);
        assert!(printer.lines(&progress(50.0)).is_empty());
        assert_eq!(printer.lines(&info("one")), vec!["[ 50.0%] one"]);
        printer.lines(&progress(100.0));
        assert_eq!(printer.lines(&info("two")), vec!["[100.0%] two"]);
    }

    #[test]
    fn build_output_names_page() {
        let page = GalleryPage {
            path: PathBuf::from("/photos/index.html"),
            html: String::new(),
        };
        assert_eq!(
            format_build_output(&page),
            vec!["==> Gallery written \u{2192} /photos/index.html"]
        );
    }
}
