use actix_web::web;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::admin::AdminKey;
use crate::archive::ArchiveStore;
use crate::config::Config;
use crate::AppState;

pub const TEST_ADMIN_KEY: &str = "test-admin-key";

/// App state over an existing, empty archive directory inside `root`.
/// The directory is not scanned; tests call `scan_archive_directory` themselves.
pub fn test_state(root: &Path) -> web::Data<AppState> {
    let mut config = Config::from_lookup(|_| None);
    config.archive_dir = root.join("archive");
    config.admin_key = Some(TEST_ADMIN_KEY.to_string());
    std::fs::create_dir_all(&config.archive_dir).expect("Failed to create archive dir");

    web::Data::new(AppState {
        archive: Arc::new(ArchiveStore::new(config.archive_dir.clone())),
        admin_key: AdminKey::from_config(config.admin_key.as_deref()),
        config,
        started_at: Instant::now(),
    })
}
