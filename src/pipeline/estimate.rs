//! Pre-pass that counts files the crawl will catalog, for percentage math.

use anyhow::Result;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::CatalogOpts;
use crate::engine::ExtFilter;
use crate::engine::tools::extension_of;

use super::walk::{WalkOutcome, WalkScope};

/// Count files under `scope` that pass `filter`. Folders never count; walk errors and entries
/// whose metadata cannot be read are skipped, as the crawl skips them.
/// Zero is a valid answer (empty tree, or nothing matches).
///
/// Returns `None` as soon as `cancel` is set.
pub fn estimate_file_count(
    scope: &WalkScope,
    filter: &ExtFilter,
    cancel: Option<&AtomicBool>,
) -> Option<u64> {
    let mut count = 0_u64;
    let mut errors = 0_u64;
    for outcome in scope.walk() {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            debug!("estimate cancelled after {} files", count);
            return None;
        }
        match outcome {
            WalkOutcome::Ok(entry) => {
                if entry.file_type().is_dir() {
                    continue;
                }
                if let Err(err) = entry.metadata() {
                    errors += 1;
                    debug!("estimate: {}: {}", entry.path().display(), err);
                    continue;
                }
                if filter.accepts(&extension_of(entry.path())) {
                    count += 1;
                }
            }
            WalkOutcome::Err { msg, .. } => {
                errors += 1;
                debug!("estimate: {}", msg);
            }
        }
    }
    debug!(
        "Estimated {} files under {} ({} walk errors)",
        count,
        scope.root.display(),
        errors
    );
    Some(count)
}

/// Estimate for a run's options. Fails only if the root is unusable.
pub fn estimate(opts: &CatalogOpts) -> Result<u64> {
    let scope = WalkScope::for_opts(opts)?;
    Ok(estimate_file_count(&scope, &opts.ext_filter, None).unwrap_or_default())
}

/// Like [`estimate`], but gives up with `Ok(None)` once `cancel` is set.
pub fn estimate_until_cancelled(opts: &CatalogOpts, cancel: &AtomicBool) -> Result<Option<u64>> {
    let scope = WalkScope::for_opts(opts)?;
    Ok(estimate_file_count(&scope, &opts.ext_filter, Some(cancel)))
}
