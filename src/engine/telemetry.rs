//! Turns cumulative counts and elapsed time into percent, rate, and ETA for display.

use std::time::Duration;

use crate::Progress;

/// Display math for one progress snapshot.
#[derive(Clone, Debug, Default)]
pub struct Telemetry {
    pub files: u64,
    pub folders: u64,
    pub estimated_total: u64,
    pub elapsed: Duration,
}

impl Telemetry {
    pub fn from_progress(p: &Progress, elapsed: Duration) -> Self {
        Self {
            files: p.files_processed,
            folders: p.folders_processed,
            estimated_total: p.estimated_total,
            elapsed,
        }
    }

    /// Percent of the estimate reached, capped at 100. `None` when there is no estimate.
    pub fn percent(&self) -> Option<f64> {
        if self.estimated_total == 0 {
            return None;
        }
        Some((self.files as f64 / self.estimated_total as f64 * 100.0).min(100.0))
    }

    /// Files per second; 0 before any time has passed.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.files as f64 / secs
        } else {
            0.0
        }
    }

    /// Remaining time extrapolated from the percent reached so far, whole seconds.
    pub fn eta(&self) -> Option<Duration> {
        let percent = self.percent()?;
        let elapsed = self.elapsed.as_secs_f64();
        if percent <= 0.0 || elapsed <= 0.0 {
            return None;
        }
        let remaining = elapsed * 100.0 / percent - elapsed;
        (remaining >= 1.0).then(|| Duration::from_secs(remaining.round() as u64))
    }
}

/// Rate with precision that shrinks as it grows: `0.25`, `12.5`, `340`.
pub fn format_speed(files_per_sec: f64) -> String {
    if files_per_sec < 1.0 {
        format!("{:.2}", files_per_sec)
    } else if files_per_sec < 100.0 {
        format!("{:.1}", files_per_sec)
    } else {
        format!("{:.0}", files_per_sec)
    }
}

/// Compact duration rounded to seconds: `1h2m3s`, `4m5s`, `6s`.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs_f64().round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}
