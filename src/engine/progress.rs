//! Progress bar utilities for displaying catalog status

use kdam::{Animation, Bar, BarExt};

use crate::Progress;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    /// Create a new progress bar configuration
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> Bar {
    kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = " files"
    )
}

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> Bar {
    kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )
}

/// Percentage bar when the estimate is known, counter otherwise.
pub fn bar_for_total(estimated_total: u64, desc: &'static str) -> Bar {
    let mut bar = if estimated_total > 0 {
        create_progress_bar(ProgressBarConfig::new(
            estimated_total as usize,
            desc,
            Animation::Classic,
        ))
    } else {
        create_counter(desc)
    };
    refresh_bar(&mut bar);
    bar
}

/// Force a refresh of the bar (e.g. so counter shows "0 files" immediately).
pub fn refresh_bar(bar: &mut Bar) {
    let _ = bar.refresh();
}

/// Move the bar to the snapshot's file count. Totals can overshoot an estimate
/// (tree grew since the pre-pass), so the count is capped at the bar total when there is one.
pub fn apply_progress(bar: &mut Bar, progress: &Progress) {
    let files = progress.files_processed as usize;
    let n = if bar.total > 0 { files.min(bar.total) } else { files };
    let _ = bar.update_to(n);
}
