//! Article archive — markdown files on disk with an in-memory catalog
//!
//! The store scans the archive directory once at startup, loads article
//! bodies lazily, and the sweeper drops bodies that have not been read for a
//! while.

pub mod error;
pub mod file_ops;
pub mod store;
pub mod sweeper;

pub use error::ArchiveError;
pub use store::ArchiveStore;
pub use sweeper::CacheSweeper;
