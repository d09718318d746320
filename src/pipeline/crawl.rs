//! Crawl-persist: walk the tree once, turn entries into folder/file rows, commit in batches.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rusqlite::Connection;
use std::fs::Metadata;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::UNIX_EPOCH;

use crate::engine::db_ops::{BatchWriter, Upsert, create_query_indexes, open_db};
use crate::engine::hashing::hash_file;
use crate::engine::mime::detect_mime;
use crate::engine::tools::{
    extension_of, file_name_string, format_mtime_utc, parent_path_string, path_to_db_string,
};
use crate::utils::config::DB_INSERT_BATCH_SIZE;
use crate::{CatalogOpts, CatalogStatus, CatalogSummary, FileRecord, FolderRecord, Progress};

use super::walk::{WalkOutcome, WalkScope};

/// Parameters for [`catalog_dir`] beyond the run options.
pub struct CrawlParams {
    /// Total from the estimator; carried in every progress snapshot. 0 = unknown.
    pub estimated_total: u64,
    /// Called after each committed batch and once at completion. Keep it fast or send to a channel.
    pub on_progress: Option<Box<dyn Fn(Progress) + Send>>,
    /// Checked after each committed batch; when set, the run stops there (nothing rolls back).
    pub cancel_check: Option<Arc<AtomicBool>>,
    /// Upserts per transaction.
    pub batch_size: usize,
}

impl Default for CrawlParams {
    fn default() -> Self {
        Self {
            estimated_total: 0,
            on_progress: None,
            cancel_check: None,
            batch_size: DB_INSERT_BATCH_SIZE,
        }
    }
}

impl CrawlParams {
    fn emit(&self, progress: Progress) {
        if let Some(ref cb) = self.on_progress {
            cb(progress);
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel_check
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }
}

/// Running counters for one crawl.
#[derive(Default)]
struct CrawlCounters {
    files: u64,
    folders: u64,
    skipped: u64,
    last_path: String,
}

impl CrawlCounters {
    fn snapshot(&self, last_path: &str, estimated_total: u64) -> Progress {
        Progress {
            files_processed: self.files,
            folders_processed: self.folders,
            last_path: last_path.to_string(),
            estimated_total,
        }
    }

    fn summary(&self, status: CatalogStatus) -> CatalogSummary {
        CatalogSummary {
            files: self.files,
            folders: self.folders,
            skipped: self.skipped,
            status,
        }
    }
}

pub fn folder_record(path: &Path, meta: &Metadata) -> FolderRecord {
    FolderRecord {
        path: path_to_db_string(path),
        parent_path: parent_path_string(path),
        mtime_utc: format_mtime_utc(meta.modified().unwrap_or(UNIX_EPOCH)),
    }
}

/// Build a file row. `ext` is the already-normalized extension.
/// Hashes only when `with_hash` and the entry is a regular file (never a pipe, device, or
/// unfollowed symlink).
pub fn file_record(path: &Path, ext: String, meta: &Metadata, with_hash: bool) -> FileRecord {
    let sha256 = if with_hash && meta.file_type().is_file() {
        hash_file(path)
    } else {
        None
    };
    FileRecord {
        abs_path: path_to_db_string(path),
        folder_path: parent_path_string(path),
        name: file_name_string(path),
        mime: detect_mime(&ext),
        ext,
        size: meta.len(),
        mtime_utc: format_mtime_utc(meta.modified().unwrap_or(UNIX_EPOCH)),
        sha256,
    }
}

/// Catalog `opts.root` into the store at `opts.db_path`.
///
/// Setup problems (bad root, unopenable store) fail before anything is walked. Walk and
/// metadata errors skip the entry. A write error rolls back the open batch and is returned;
/// earlier batches stay committed.
pub fn catalog_dir(opts: &CatalogOpts, params: &CrawlParams) -> Result<CatalogSummary> {
    let scope = WalkScope::for_opts(opts)?;
    let mut conn = open_db(&opts.db_path)?;
    debug!(
        "Cataloging {} -> {} (filter: [{}], hash: {})",
        scope.root.display(),
        opts.db_path.display(),
        opts.ext_filter,
        opts.with_hash
    );
    crawl_into(&mut conn, &scope, opts, params)
}

/// Crawl `scope` into an already-open store (schema must exist).
pub fn crawl_into(
    conn: &mut Connection,
    scope: &WalkScope,
    opts: &CatalogOpts,
    params: &CrawlParams,
) -> Result<CatalogSummary> {
    let mut writer = BatchWriter::new(conn, params.batch_size);
    let mut counters = CrawlCounters::default();

    for outcome in scope.walk() {
        let entry = match outcome {
            WalkOutcome::Ok(entry) => entry,
            WalkOutcome::Err { msg, path } => {
                counters.skipped += 1;
                debug!("skipped {:?}: {}", path, msg);
                continue;
            }
        };
        let path = entry.path();
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                counters.skipped += 1;
                debug!("skipped {}: {}", path.display(), err);
                continue;
            }
        };

        let upsert = if entry.file_type().is_dir() {
            counters.folders += 1;
            Upsert::Folder(folder_record(path, &meta))
        } else {
            let ext = extension_of(path);
            if !opts.ext_filter.accepts(&ext) {
                continue;
            }
            counters.files += 1;
            Upsert::File(file_record(path, ext, &meta, opts.with_hash))
        };
        counters.last_path = upsert.path().to_string();
        writer.push(upsert);

        if writer.is_full() {
            let committed = writer.committed();
            writer.flush().with_context(|| {
                format!("batch write failed ({} rows committed before it)", committed)
            })?;
            params.emit(counters.snapshot(&counters.last_path, params.estimated_total));
            if params.cancelled() {
                info!(
                    "Cataloging cancelled; {} rows committed, store is consistent",
                    writer.committed()
                );
                report_skipped(&counters);
                return Ok(counters.summary(CatalogStatus::Cancelled));
            }
        }
    }

    let committed = writer.committed();
    writer.flush().with_context(|| {
        format!("final batch write failed ({} rows committed before it)", committed)
    })?;
    params.emit(counters.snapshot("", params.estimated_total));

    if let Err(e) = create_query_indexes(writer.conn()) {
        warn!("{:#}", e);
    }
    report_skipped(&counters);
    debug!(
        "Catalog complete: {} files, {} folders",
        counters.files, counters.folders
    );
    Ok(counters.summary(CatalogStatus::Completed))
}

fn report_skipped(counters: &CrawlCounters) {
    if counters.skipped > 0 {
        warn!(
            "Skipped {} paths due to permission errors or access issues",
            counters.skipped
        );
    }
}
