//! ArchiveStore — the in-memory article catalog backed by markdown files
//!
//! Owns every article record and is the only writer to the archive directory.
//! All access goes through a single mutex, so each operation (including its
//! file I/O) runs to completion before the next one starts.

use super::ArchiveError;
use super::file_ops;
use crate::models::{Article, ArticleSummary, CachedContent, LoadFailure};
use chrono::{DateTime, Local, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

struct ArchiveInner {
    /// Keyed by id; ids are handed out in increasing order, so iteration
    /// order is insertion order.
    articles: BTreeMap<u64, Article>,
    next_id: u64,
}

pub struct ArchiveStore {
    archive_dir: PathBuf,
    inner: Mutex<ArchiveInner>,
}

impl ArchiveStore {
    /// Create an empty store for the given directory. Nothing touches disk
    /// until [`scan_archive_directory`](Self::scan_archive_directory).
    pub fn new(archive_dir: PathBuf) -> Self {
        Self {
            archive_dir,
            inner: Mutex::new(ArchiveInner {
                articles: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Register every markdown file in the archive directory with its content
    /// left unloaded. Creates the directory (and registers nothing) when it
    /// does not exist yet. Meant to run once at startup.
    pub fn scan_archive_directory(&self) -> Result<usize, ArchiveError> {
        if !self.archive_dir.exists() {
            std::fs::create_dir_all(&self.archive_dir).map_err(|source| {
                ArchiveError::Directory {
                    path: self.archive_dir.clone(),
                    source,
                }
            })?;
            log::info!(
                "[ARCHIVE] Created archive directory: {}",
                self.archive_dir.display()
            );
            return Ok(0);
        }

        let files = file_ops::list_articles(&self.archive_dir).map_err(|source| {
            ArchiveError::Scan {
                path: self.archive_dir.clone(),
                source,
            }
        })?;
        log::info!("[ARCHIVE] Found {} markdown files in archive", files.len());

        let mut inner = self.inner.lock();
        for file_path in &files {
            let now = Utc::now();
            let (created_at, updated_at) = file_ops::file_times(file_path, now);
            let id = inner.next_id;
            inner.next_id += 1;

            let article = Article {
                id,
                title: file_ops::title_from_path(file_path),
                content: CachedContent::Unloaded,
                created_at,
                updated_at,
                file_path: Some(file_path.clone()),
                last_accessed: now,
            };
            log::info!("[ARCHIVE] Added archived article: {} (ID: {})", article.title, id);
            inner.articles.insert(id, article);
        }

        Ok(files.len())
    }

    /// Metadata of every article, in insertion order
    pub fn list_articles(&self) -> Vec<ArticleSummary> {
        let inner = self.inner.lock();
        inner.articles.values().map(ArticleSummary::from).collect()
    }

    /// Look up an article, loading its content from disk if it is not cached.
    ///
    /// A missing or unreadable file does not fail the lookup: the returned
    /// snapshot carries `CachedContent::Unavailable` while the stored record
    /// stays unloaded, so the next lookup tries the file again.
    pub fn get_article(&self, id: u64) -> Option<Article> {
        let mut inner = self.inner.lock();
        let article = inner.articles.get_mut(&id)?;

        let mut failure = None;
        if !article.content.is_loaded() {
            if let Some(path) = &article.file_path {
                match file_ops::read_article(path) {
                    Ok(text) => {
                        log::info!(
                            "[ARCHIVE] Loaded content for article {} from {}",
                            id,
                            path.display()
                        );
                        article.content = CachedContent::Loaded(text);
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        log::warn!("[ARCHIVE] Article file missing: {}", path.display());
                        failure = Some(LoadFailure::FileMissing);
                    }
                    Err(e) => {
                        log::error!("[ARCHIVE] Error loading content for article {}: {}", id, e);
                        failure = Some(LoadFailure::ReadFailed);
                    }
                }
            }
        }

        article.last_accessed = Utc::now();

        let mut snapshot = article.clone();
        if let Some(failure) = failure {
            snapshot.content = CachedContent::Unavailable(failure);
        }
        Some(snapshot)
    }

    /// Write a new article file and register it with its content cached.
    /// Nothing is registered if the file cannot be written.
    pub fn create_article(&self, title: &str, content: &str) -> Result<Article, ArchiveError> {
        let now = Utc::now();
        let stem = file_ops::sanitize_title(title);
        let date_suffix = now.with_timezone(&Local).format("%d%m%y").to_string();

        let mut inner = self.inner.lock();

        let file_path = file_ops::create_exclusive(&self.archive_dir, &stem, &date_suffix, content)
            .map_err(|source| {
                log::error!("[ARCHIVE] Failed to create article file: {}", source);
                ArchiveError::Create {
                    path: self.archive_dir.clone(),
                    source,
                }
            })?;

        let id = inner.next_id;
        inner.next_id += 1;

        let article = Article {
            id,
            title: title.to_string(),
            content: CachedContent::Loaded(content.to_string()),
            created_at: now,
            updated_at: now,
            file_path: Some(file_path),
            last_accessed: now,
        };
        inner.articles.insert(id, article.clone());
        log::info!("[ARCHIVE] Created new article: {} (ID: {})", title, id);

        Ok(article)
    }

    /// Replace an article's title and content.
    ///
    /// The backing file is written first; the in-memory record only changes
    /// once that write succeeded. The file keeps its original name.
    pub fn update_article(
        &self,
        id: u64,
        title: &str,
        content: &str,
    ) -> Result<Option<Article>, ArchiveError> {
        let mut inner = self.inner.lock();
        let Some(article) = inner.articles.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(path) = &article.file_path {
            file_ops::write_article(path, content).map_err(|source| {
                log::error!("[ARCHIVE] Failed to update article file: {}", source);
                ArchiveError::Write {
                    path: path.clone(),
                    source,
                }
            })?;
        }

        let now = Utc::now();
        article.title = title.to_string();
        article.content = CachedContent::Loaded(content.to_string());
        article.updated_at = now;
        article.last_accessed = now;
        log::info!("[ARCHIVE] Updated article {}: {}", id, title);

        Ok(Some(article.clone()))
    }

    /// Remove an article and, best effort, its backing file.
    /// Returns false (and only logs) when the id is unknown.
    pub fn delete_article(&self, id: u64) -> bool {
        let mut inner = self.inner.lock();
        let Some(article) = inner.articles.remove(&id) else {
            log::warn!("[ARCHIVE] Article {} not found for deletion", id);
            return false;
        };

        if let Some(path) = &article.file_path {
            match std::fs::remove_file(path) {
                Ok(()) => log::info!("[ARCHIVE] Deleted article file: {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("[ARCHIVE] Article file already gone: {}", path.display())
                }
                Err(e) => log::error!("[ARCHIVE] Failed to delete article file: {}", e),
            }
        }

        log::info!("[ARCHIVE] Deleted article {}", id);
        true
    }

    /// Drop cached content of file-backed articles idle for longer than
    /// `expiry` as of `now`. Returns how many were evicted.
    pub fn evict_idle(&self, now: DateTime<Utc>, expiry: Duration) -> usize {
        let mut inner = self.inner.lock();
        let mut evicted = 0;

        for article in inner.articles.values_mut() {
            if article.file_path.is_none() || !article.content.is_loaded() {
                continue;
            }
            let idle = now
                .signed_duration_since(article.last_accessed)
                .to_std()
                .map(|idle| idle > expiry)
                .unwrap_or(false);
            if idle {
                article.content = CachedContent::Unloaded;
                evicted += 1;
                log::debug!("[ARCHIVE] Cleaned cache for article {}", article.id);
            }
        }

        evicted
    }

    pub fn len(&self) -> usize {
        self.inner.lock().articles.len()
    }

    /// Number of articles currently holding their content in memory
    pub fn cached_count(&self) -> usize {
        self.inner
            .lock()
            .articles
            .values()
            .filter(|a| a.content.is_loaded())
            .count()
    }
}
