//! Public types for the catalog API and pipeline.

use std::path::PathBuf;

use crate::engine::ExtFilter;

/// One row of the `folders` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderRecord {
    /// Absolute, canonicalized directory path.
    pub path: String,
    /// Parent directory path; empty for a filesystem root.
    pub parent_path: String,
    /// RFC 3339 UTC, second precision.
    pub mtime_utc: String,
}

/// One row of the `files` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub abs_path: String,
    pub folder_path: String,
    pub name: String,
    /// Lowercase, dot-prefixed (`.pdf`), or empty when the name has no extension.
    pub ext: String,
    pub size: u64,
    pub mtime_utc: String,
    pub mime: String,
    /// Lowercase hex SHA-256. `None` when hashing is off or the file could not be read;
    /// a `None` never clears a hash already in the store.
    pub sha256: Option<String>,
}

/// Options for one catalog run. Built by the CLI (or any caller) and passed in explicitly.
#[derive(Clone, Debug)]
pub struct CatalogOpts {
    /// Directory to catalog. Must exist and be a readable directory.
    pub root: PathBuf,
    /// SQLite store; created if absent. Its parent directory must exist.
    pub db_path: PathBuf,
    /// Files whose extension is not in the filter are skipped. Empty accepts all.
    pub ext_filter: ExtFilter,
    /// Compute SHA-256 for every cataloged file.
    pub with_hash: bool,
    /// Follow symbolic links during the walk.
    pub follow_links: bool,
}

impl CatalogOpts {
    pub fn new(root: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            db_path: db_path.into(),
            ext_filter: ExtFilter::default(),
            with_hash: false,
            follow_links: false,
        }
    }
}

/// Snapshot emitted after each committed batch and once at completion.
///
/// Counts are cumulative for the run. `last_path` is the most recently processed path,
/// or empty on the final snapshot. `estimated_total` is whatever the caller passed in;
/// zero means no percentage is available.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub files_processed: u64,
    pub folders_processed: u64,
    pub last_path: String,
    pub estimated_total: u64,
}

/// How a run that did not fail ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogStatus {
    /// Walk finished, last batch committed, query indexes created.
    Completed,
    /// Caller asked to stop; everything up to the last committed batch is in the store.
    Cancelled,
}

/// Totals for a finished (completed or cancelled) run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogSummary {
    pub files: u64,
    pub folders: u64,
    /// Entries dropped because of walk or metadata errors.
    pub skipped: u64,
    pub status: CatalogStatus,
}

/// Messages from a threaded run (see [`spawn_catalog`](crate::pipeline::spawn_catalog)).
/// Exactly one `Done` ends every run.
#[derive(Debug)]
pub enum CatalogEvent {
    /// Pre-pass finished with this many matching files.
    Estimated(u64),
    Progress(Progress),
    /// Terminal message. `Err` carries the setup or write error that ended the run.
    Done(crate::Result<CatalogSummary>),
}
