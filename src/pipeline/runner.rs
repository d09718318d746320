//! Threaded runner: estimate + crawl on a worker thread, events on a channel.

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::{CatalogEvent, CatalogOpts, CatalogStatus, CatalogSummary};

use super::crawl::{CrawlParams, catalog_dir};
use super::estimate::estimate_until_cancelled;

/// Handles for a run started by [`spawn_catalog`]. Receive from `events` until `Done`.
pub struct CatalogHandle {
    pub events: Receiver<CatalogEvent>,
    pub worker: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
}

impl CatalogHandle {
    /// Ask the run to stop: the estimate stops at the next entry, the crawl at its next
    /// batch boundary.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Shared flag behind [`Self::cancel`].
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn join(self) -> Result<()> {
        self.worker
            .join()
            .map_err(|_| anyhow::anyhow!("catalog thread panicked"))
    }
}

/// Start a run on its own thread. When `estimate_first` the estimator runs to completion
/// before the crawl and its total is sent as `Estimated`; otherwise the total is 0.
///
/// The channel is unbounded: the crawl never waits on a slow consumer.
pub fn spawn_catalog(opts: CatalogOpts, estimate_first: bool) -> CatalogHandle {
    spawn_catalog_with_cancel(opts, estimate_first, Arc::new(AtomicBool::new(false)))
}

/// [`spawn_catalog`] driven by a caller-owned cancel flag (e.g. one a Ctrl+C handler sets).
/// A flag that is already set ends the run with `Cancelled` before anything is written.
pub fn spawn_catalog_with_cancel(
    opts: CatalogOpts,
    estimate_first: bool,
    cancel: Arc<AtomicBool>,
) -> CatalogHandle {
    let (event_tx, events) = unbounded::<CatalogEvent>();
    let cancel_w = Arc::clone(&cancel);

    let worker = thread::spawn(move || {
        let result = run_catalog(&opts, estimate_first, &event_tx, cancel_w);
        let _ = event_tx.send(CatalogEvent::Done(result));
    });

    CatalogHandle {
        events,
        worker,
        cancel,
    }
}

fn cancelled_before_crawl() -> CatalogSummary {
    CatalogSummary {
        files: 0,
        folders: 0,
        skipped: 0,
        status: CatalogStatus::Cancelled,
    }
}

fn run_catalog(
    opts: &CatalogOpts,
    estimate_first: bool,
    event_tx: &Sender<CatalogEvent>,
    cancel: Arc<AtomicBool>,
) -> Result<CatalogSummary> {
    let estimated_total = if estimate_first {
        let Some(n) = estimate_until_cancelled(opts, &cancel)? else {
            return Ok(cancelled_before_crawl());
        };
        let _ = event_tx.send(CatalogEvent::Estimated(n));
        n
    } else {
        0
    };
    if cancel.load(Ordering::Relaxed) {
        return Ok(cancelled_before_crawl());
    }
    let progress_tx = event_tx.clone();
    let params = CrawlParams {
        estimated_total,
        on_progress: Some(Box::new(move |p| {
            let _ = progress_tx.send(CatalogEvent::Progress(p));
        })),
        cancel_check: Some(cancel),
        ..CrawlParams::default()
    };
    catalog_dir(opts, &params)
}
