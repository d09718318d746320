//! Interactive catalog run: estimate, crawl on a worker thread, render progress, report.

use anyhow::{Context, Result};
use kdam::Bar;
use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::engine::progress::{apply_progress, bar_for_total};
use crate::engine::telemetry::{Telemetry, format_duration, format_speed};
use crate::pipeline::spawn_catalog_with_cancel;
use crate::utils::Colors;
use crate::{CatalogEvent, CatalogOpts, CatalogStatus, CatalogSummary, Progress};

const BAR_DESC: &str = "Cataloging";

/// Process-wide Ctrl+C handling for the CLI. Install once, before any run.
///
/// The first Ctrl+C sets `cancel`: the estimate stops at once, the crawl at its next batch
/// commit. A second Ctrl+C exits with status 130.
pub fn install_interrupt_handler(cancel: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        if cancel.swap(true, Ordering::Relaxed) {
            eprintln!();
            std::process::exit(130);
        }
        eprintln!("\nStopping at the next batch commit (Ctrl+C again to quit now)");
    })
    .context("set Ctrl+C handler")
}

/// Catalog `opts` with a progress bar (when `show_bar`), stopping when `cancel` is set.
///
/// A stop keeps every committed batch; the store stays valid up to that point and the
/// run returns `Ok` with [`CatalogStatus::Cancelled`]. Safe to call repeatedly in one
/// process; signal handling is left to the caller (see [`install_interrupt_handler`]).
pub fn catalog_with_progress(
    opts: &CatalogOpts,
    estimate_first: bool,
    show_bar: bool,
    cancel: Arc<AtomicBool>,
) -> Result<CatalogSummary> {
    let start = Instant::now();
    let handle = spawn_catalog_with_cancel(opts.clone(), estimate_first, cancel);

    if estimate_first {
        info!("Estimating files under {} ...", opts.root.display());
    }
    let mut bar: Option<Bar> = (show_bar && !estimate_first).then(|| bar_for_total(0, BAR_DESC));
    let mut last = Progress::default();

    let result = loop {
        match handle.events.recv() {
            Ok(CatalogEvent::Estimated(n)) => {
                info!("Estimated {} files", n);
                if show_bar {
                    bar = Some(bar_for_total(n, BAR_DESC));
                }
            }
            Ok(CatalogEvent::Progress(p)) => {
                if let Some(b) = bar.as_mut() {
                    apply_progress(b, &p);
                }
                if !p.last_path.is_empty() {
                    let t = Telemetry::from_progress(&p, start.elapsed());
                    debug!(
                        "committed through {} ({} files/sec, eta {})",
                        p.last_path,
                        format_speed(t.rate()),
                        t.eta().map(format_duration).unwrap_or_else(|| "?".into())
                    );
                }
                last = p;
            }
            Ok(CatalogEvent::Done(r)) => break r,
            Err(_) => break Err(anyhow::anyhow!("catalog thread ended without a result")),
        }
    };
    if bar.is_some() {
        eprintln!();
    }
    handle.join()?;

    let elapsed = start.elapsed();
    match &result {
        Ok(summary) => print_summary(opts, summary, &last, elapsed),
        Err(e) => error!(
            "{} after {} files, {} folders: {:#}",
            Colors::colorize(Colors::ERROR, "Stopped"),
            last.files_processed,
            last.folders_processed,
            e
        ),
    }
    result
}

fn print_summary(opts: &CatalogOpts, summary: &CatalogSummary, last: &Progress, elapsed: Duration) {
    let telemetry = Telemetry {
        files: summary.files,
        folders: summary.folders,
        estimated_total: last.estimated_total,
        elapsed,
    };
    let headline = match summary.status {
        CatalogStatus::Completed => "Catalog complete",
        CatalogStatus::Cancelled => "Catalog stopped early (partial catalog saved)",
    };
    info!("{}", headline);
    info!(
        "{} | {} | {} elapsed | {} files/sec",
        Colors::colorize(Colors::FILES, &format!("Files: {}", summary.files)),
        Colors::colorize(Colors::FOLDERS, &format!("Folders: {}", summary.folders)),
        format_duration(elapsed),
        format_speed(telemetry.rate())
    );
    if let Some(pct) = telemetry.percent()
        && summary.status == CatalogStatus::Cancelled
    {
        info!("Reached {:.1}% of the estimate", pct);
    }
    info!(
        "{} {}",
        Colors::colorize(Colors::LABEL, "Database:"),
        opts.db_path.display()
    );
    info!(
        "Query it: sqlite3 {} \"SELECT ext, COUNT(*) FROM files GROUP BY ext\"",
        opts.db_path.display()
    );
}
