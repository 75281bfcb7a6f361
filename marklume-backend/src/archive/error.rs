use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to prepare archive directory {path}: {source}")]
    Directory { path: PathBuf, source: io::Error },
    #[error("Failed to scan archive directory {path}: {source}")]
    Scan { path: PathBuf, source: io::Error },
    #[error("Failed to create article file in {path}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("Failed to write article file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}
