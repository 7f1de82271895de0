//! Download archive.
//!
//! Optionally bundles every exported original into one ZIP file next to the
//! page, and links it from the page header. Entries are stored flat under
//! their file names.

use crate::events::Reporter;
use crate::types::ImageEntry;
use maud::{Markup, html};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Archive name is empty")]
    EmptyName,
}

/// `.zip` is appended when missing, then spaces become underscores.
///
/// ```
/// use picture_table::archive::normalize_archive_name;
///
/// assert_eq!(normalize_archive_name("My Photos"), "My_Photos.zip");
/// assert_eq!(normalize_archive_name("archive.zip"), "archive.zip");
/// ```
pub fn normalize_archive_name(name: &str) -> String {
    let name = name.trim();
    let with_ext = if name.to_ascii_lowercase().ends_with(".zip") {
        name.to_string()
    } else {
        format!("{name}.zip")
    };
    with_ext.replace(' ', "_")
}

/// Write `files` into `<source>/<normalized name>` and return its path.
///
/// An existing archive of the same name is replaced. Emits one progress
/// update and one info message per file. The archive is built under a
/// `.tmp` name and moved into place only once complete, so a failed run
/// leaves no archive behind.
pub fn create_archive(
    source: &Path,
    name: &str,
    files: &[ImageEntry],
    reporter: &Reporter,
) -> Result<PathBuf, ArchiveError> {
    if name.trim().is_empty() {
        return Err(ArchiveError::EmptyName);
    }
    let path = source.join(normalize_archive_name(name));
    if path.exists() {
        fs::remove_file(&path)?;
    }

    let partial = partial_path(&path);
    if let Err(e) = write_zip(&partial, files, reporter) {
        if partial.exists() {
            fs::remove_file(&partial)?;
        }
        return Err(e);
    }
    fs::rename(&partial, &path)?;
    Ok(path)
}

/// `gallery.zip` is built as `gallery.zip.tmp`.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_zip(path: &Path, files: &[ImageEntry], reporter: &Reporter) -> Result<(), ArchiveError> {
    let mut zip = ZipWriter::new(File::create(path)?);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let total = files.len();
    for (i, entry) in files.iter().enumerate() {
        reporter.progress(i + 1, total);
        reporter.info(format!(
            "Create archive ({:.2}%)",
            crate::events::progress_percent(i + 1, total)
        ));

        zip.start_file(entry.filename.as_str(), options)?;
        let mut original = File::open(&entry.path)?;
        io::copy(&mut original, &mut zip)?;
        debug!(file = %entry.filename, "added to archive");
    }

    zip.finish()?;
    Ok(())
}

/// Download notice placed above the table.
pub fn archive_notice(file_name: &str) -> Markup {
    html! {
        "You can download all pictures here: "
        a href=(file_name) { (file_name) }
        br; br;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::InfoLevel;
    use crate::test_helpers::{drain, entry_in, messages, recording_reporter};
    use std::io::Read;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> ImageEntry {
        fs::write(dir.join(name), contents).unwrap();
        let mut entry = entry_in(dir, name);
        entry.len = contents.len() as u64;
        entry
    }

    // =========================================================================
    // Naming
    // =========================================================================

    #[test]
    fn normalize_appends_extension_and_replaces_spaces() {
        assert_eq!(normalize_archive_name("My Photos"), "My_Photos.zip");
        assert_eq!(normalize_archive_name("summer 2024 trip"), "summer_2024_trip.zip");
    }

    #[test]
    fn normalize_keeps_existing_extension() {
        assert_eq!(normalize_archive_name("archive.zip"), "archive.zip");
        assert_eq!(normalize_archive_name("ARCHIVE.ZIP"), "ARCHIVE.ZIP");
        assert_eq!(normalize_archive_name("my archive.zip"), "my_archive.zip");
    }

    #[test]
    fn notice_embeds_name_twice() {
        assert_eq!(
            archive_notice("My_Photos.zip").into_string(),
            r#"You can download all pictures here: <a href="My_Photos.zip">My_Photos.zip</a><br><br>"#
        );
    }

    // =========================================================================
    // Writing
    // =========================================================================

    #[test]
    fn archive_holds_all_files_flat() {
        let tmp = TempDir::new().unwrap();
        let files = vec![
            write_file(tmp.path(), "a.jpg", b"first"),
            write_file(tmp.path(), "b.png", b"second"),
        ];

        let path = create_archive(tmp.path(), "My Photos", &files, &Reporter::silent()).unwrap();
        assert_eq!(path, tmp.path().join("My_Photos.zip"));

        let mut zip = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(zip.len(), 2);
        let mut contents = String::new();
        zip.by_name("b.png")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "second");
    }

    #[test]
    fn existing_archive_is_replaced() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("gallery.zip"), b"stale, not a zip").unwrap();
        let files = vec![write_file(tmp.path(), "a.jpg", b"data")];

        let path = create_archive(tmp.path(), "gallery", &files, &Reporter::silent()).unwrap();

        let zip = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
    }

    #[test]
    fn progress_messages_per_file() {
        let tmp = TempDir::new().unwrap();
        let files = vec![
            write_file(tmp.path(), "a.jpg", b"1"),
            write_file(tmp.path(), "b.jpg", b"2"),
            write_file(tmp.path(), "c.jpg", b"3"),
        ];
        let (reporter, rx) = recording_reporter();

        create_archive(tmp.path(), "gallery", &files, &reporter).unwrap();

        assert_eq!(
            messages(&drain(&rx), InfoLevel::Info),
            vec![
                "Create archive (33.33%)",
                "Create archive (66.67%)",
                "Create archive (100.00%)",
            ]
        );
    }

    #[test]
    fn missing_original_is_error() {
        let tmp = TempDir::new().unwrap();
        let files = vec![entry_in(tmp.path(), "gone.jpg")];

        let result = create_archive(tmp.path(), "gallery", &files, &Reporter::silent());
        assert!(matches!(result, Err(ArchiveError::Io(_))));
        assert!(!tmp.path().join("gallery.zip").exists());
    }

    #[test]
    fn failure_partway_leaves_no_archive() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("gallery.zip"), b"previous run").unwrap();
        let files = vec![
            write_file(tmp.path(), "a.jpg", b"present"),
            entry_in(tmp.path(), "gone.jpg"),
        ];

        let result = create_archive(tmp.path(), "gallery", &files, &Reporter::silent());

        assert!(result.is_err());
        assert!(!tmp.path().join("gallery.zip").exists());
        assert!(!tmp.path().join("gallery.zip.tmp").exists());
    }

    #[test]
    fn successful_archive_leaves_no_partial_file() {
        let tmp = TempDir::new().unwrap();
        let files = vec![write_file(tmp.path(), "a.jpg", b"data")];

        create_archive(tmp.path(), "gallery", &files, &Reporter::silent()).unwrap();

        assert!(tmp.path().join("gallery.zip").exists());
        assert!(!tmp.path().join("gallery.zip.tmp").exists());
    }

    #[test]
    fn blank_name_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = create_archive(tmp.path(), "  ", &[], &Reporter::silent());
        assert!(matches!(result, Err(ArchiveError::EmptyName)));
    }
}
