use clap::Parser;
use std::path::PathBuf;

/// Catalog a directory tree into SQLite for offline querying.
#[derive(Clone, Parser)]
#[command(name = "spcatalog")]
#[command(
    about = "Walk a directory (e.g. a synced SharePoint/OneDrive folder) and record every folder and file in <OUT>/catalog.db."
)]
pub struct Cli {
    /// Directory to catalog. Default: the last cataloged root.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Output directory for catalog.db. Default: last used, else ~/spcatalog.
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Only catalog these extensions, comma separated (e.g. ".pdf,docx"). Empty: all files.
    #[arg(long, short = 'e', value_name = "LIST")]
    pub ext: Option<String>,

    /// Compute SHA-256 for each cataloged file (reads every file).
    #[arg(long, short = 'c', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub hash: Option<bool>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Skip the counting pre-pass; progress shows a running count instead of a percentage.
    #[arg(long)]
    pub no_estimate: bool,

    /// Hide the progress bar.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Print recently cataloged roots and exit.
    #[arg(long)]
    pub recent: bool,
}
