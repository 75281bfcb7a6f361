//! Periodic eviction of idle article content.

use super::ArchiveStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct CacheSweeper {
    store: Arc<ArchiveStore>,
    interval: Duration,
    expiry: Duration,
}

impl CacheSweeper {
    pub fn new(store: Arc<ArchiveStore>, interval: Duration, expiry: Duration) -> Self {
        Self {
            store,
            interval,
            expiry,
        }
    }

    /// Run one pass as of `now`; returns the number of evicted articles
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let cleaned = self.store.evict_idle(now, self.expiry);
        if cleaned > 0 {
            log::info!("[SWEEPER] Cleaned {} article caches", cleaned);
        } else {
            log::debug!("[SWEEPER] Nothing to clean");
        }
        cleaned
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Sweep every `interval` until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        log::info!(
            "[SWEEPER] Started (interval {}s, expiry {}s)",
            self.interval.as_secs(),
            self.expiry.as_secs()
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    log::info!("[SWEEPER] Shutdown requested, stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.sweep();
                }
            }
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const WINDOW: Duration = Duration::from_secs(30 * 60);

    #[test]
    fn test_sweep_scenario() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("archive");
        std::fs::create_dir(&archive).unwrap();
        std::fs::write(archive.join("Notes.md"), "hello").unwrap();

        let store = Arc::new(ArchiveStore::new(archive));
        store.scan_archive_directory().unwrap();
        let sweeper = CacheSweeper::new(store.clone(), WINDOW, WINDOW);

        let listed = store.list_articles();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Notes");
        assert_eq!(store.cached_count(), 0);

        let article = store.get_article(1).unwrap();
        assert_eq!(article.content.text(), "hello");

        assert_eq!(sweeper.sweep(), 0);
        assert_eq!(store.cached_count(), 1);

        let later = article.last_accessed + chrono::Duration::minutes(31);
        assert_eq!(sweeper.sweep_at(later), 1);
        assert_eq!(store.cached_count(), 0);

        let article = store.get_article(1).unwrap();
        assert_eq!(article.content.text(), "hello");
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = Arc::new(ArchiveStore::new(dir.path().join("archive")));
        store.scan_archive_directory().unwrap();
        let first = store.create_article("One", "1").unwrap();
        store.create_article("Two", "2").unwrap();

        let sweeper = CacheSweeper::new(store.clone(), WINDOW, WINDOW);
        let later = first.last_accessed + chrono::Duration::hours(1);

        assert_eq!(sweeper.sweep_at(later), 2);
        assert_eq!(sweeper.sweep_at(later), 0);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_run_evicts_and_stops_on_cancel() {
        let dir = tempdir().unwrap();
        let store = Arc::new(ArchiveStore::new(dir.path().join("archive")));
        store.scan_archive_directory().unwrap();
        store.create_article("Hot", "body").unwrap();
        assert_eq!(store.cached_count(), 1);

        let shutdown = CancellationToken::new();
        let handle = CacheSweeper::new(store.clone(), Duration::from_millis(10), Duration::ZERO)
            .spawn(shutdown.clone());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.cached_count(), 0);

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop")
            .expect("sweeper panicked");
    }
}
