//! spcatalog: catalog a directory tree into SQLite for offline querying.

pub mod catalog;
pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::ExtFilter;
pub use pipeline::{
    CatalogHandle, CrawlParams, estimate, spawn_catalog, spawn_catalog_with_cancel,
};

use log::debug;

/// Result alias used by public spcatalog API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: catalog `opts.root` into `opts.db_path`, blocking until done.
///
/// - **`estimated_total`**: result of [`estimate`] if the caller ran it (pass 0 to skip; progress
///   then has no percentage).
/// - **`on_progress: None`** → no snapshots; the returned summary is the only report.
/// - **`on_progress: Some(f)`** → `f` gets a [`Progress`] after every committed batch and once at
///   the end (with an empty `last_path`). Keep it fast or send to a channel.
///
/// For a threaded run with an event channel use [`spawn_catalog`].
pub fn catalog_dir<F>(
    opts: &CatalogOpts,
    estimated_total: u64,
    on_progress: Option<F>,
) -> Result<CatalogSummary>
where
    F: Fn(Progress) + Send + 'static,
{
    debug!(
        "{} CONFIG:{:#?}",
        crate::utils::PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );
    let params = CrawlParams {
        estimated_total,
        on_progress: on_progress.map(|f| Box::new(f) as Box<dyn Fn(Progress) + Send>),
        ..CrawlParams::default()
    };
    pipeline::catalog_dir(opts, &params)
}
