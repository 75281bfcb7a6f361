//! File operations for the article archive
//!
//! Handles title sanitization, collision-free file creation, and reading,
//! writing and enumerating the markdown files in the archive directory.

use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Extension of every article file
pub const ARTICLE_EXTENSION: &str = "md";

/// Upper bound on suffixed names tried before giving up on a title
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Sanitize a title for use as a file stem (e.g. "My Title!" -> "My Title_").
/// Alphanumerics, spaces, hyphens and underscores survive; everything else
/// becomes an underscore.
pub fn sanitize_title(title: &str) -> String {
    let safe: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if safe.trim().is_empty() {
        "untitled".to_string()
    } else {
        safe
    }
}

/// File name for the given attempt: the bare stem first, then
/// `<stem>_<date>_<n>` for n = 1, 2, ...
pub fn candidate_file_name(stem: &str, date_suffix: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}.{}", stem, ARTICLE_EXTENSION)
    } else {
        format!("{}_{}_{}.{}", stem, date_suffix, attempt, ARTICLE_EXTENSION)
    }
}

/// Create a new article file without ever replacing an existing one.
///
/// Each candidate name is opened with `create_new`, so a name taken between
/// two attempts (by this process or another) just moves on to the next one.
pub fn create_exclusive(
    archive_dir: &Path,
    stem: &str,
    date_suffix: &str,
    content: &str,
) -> io::Result<PathBuf> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = archive_dir.join(candidate_file_name(stem, date_suffix, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(content.as_bytes()) {
                    drop(file);
                    let _ = fs::remove_file(&path);
                    return Err(e);
                }
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for '{}' after {} attempts", stem, MAX_NAME_ATTEMPTS),
    ))
}

/// Overwrite an existing article file. Parent directories are not created.
pub fn write_article(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Read an article file as UTF-8
pub fn read_article(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// List markdown files directly inside the archive directory, sorted by name.
/// Subdirectories and hidden files are skipped.
pub fn list_articles(archive_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(archive_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true)
        {
            continue;
        }
        if path.is_file()
            && path
                .extension()
                .map(|e| e == ARTICLE_EXTENSION)
                .unwrap_or(false)
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Title derived from a file name (stem without extension)
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Creation and modification times of a file, each falling back to `now`
pub fn file_times(path: &Path, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    match fs::metadata(path) {
        Ok(metadata) => {
            let created = metadata.created().map(DateTime::<Utc>::from).unwrap_or(now);
            let modified = metadata.modified().map(DateTime::<Utc>::from).unwrap_or(now);
            (created, modified)
        }
        Err(e) => {
            log::debug!("[ARCHIVE] No metadata for {}: {}", path.display(), e);
            (now, now)
        }
    }
}
