//! Terminal logging: `[spcatalog] message`, with level and module on warnings and errors.

use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

use crate::utils::config::PackagePaths;

fn level_tag(level: Level) -> Option<ColoredString> {
    match level {
        Level::Error => Some("ERROR".red()),
        Level::Warn => Some("WARN".yellow()),
        Level::Debug | Level::Trace => Some("debug".dimmed()),
        Level::Info => None,
    }
}

/// Install the logger. Dependencies log at warn; this crate at info, or debug when `verbose`.
/// A logger installed earlier (e.g. by an embedding program) is left in place.
pub fn setup_logging(verbose: bool) {
    let pkg = PackagePaths::get().pkg_name();
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(pkg, level)
        .format(move |buf, record| {
            let prefix = pkg.cyan();
            match level_tag(record.level()) {
                None => writeln!(buf, "[{}] {}", prefix, record.args()),
                Some(tag) if record.level() <= Level::Warn => writeln!(
                    buf,
                    "[{} {} {}] {}",
                    prefix,
                    tag,
                    record.target().white(),
                    record.args()
                ),
                Some(tag) => writeln!(buf, "[{} {}] {}", prefix, tag, record.args()),
            }
        })
        .try_init();
}

/// Summary palette for the end-of-run report.
pub struct Colors;

impl Colors {
    pub const FILES: &'static str = "green";
    pub const FOLDERS: &'static str = "blue";
    pub const LABEL: &'static str = "bright black";
    pub const ERROR: &'static str = "red";

    pub fn colorize(color: &str, text: &str) -> ColoredString {
        text.color(color).bold()
    }
}
