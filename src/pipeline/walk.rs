//! Common walk: one serial walkdir traversal shared by the estimator and the crawl.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::CatalogOpts;
use crate::engine::tools::{check_root_and_canonicalize, store_paths};

/// One result from the directory walk: an entry to consider, or an error with optional path.
pub enum WalkOutcome {
    Ok(walkdir::DirEntry),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok(entry),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// What to walk: canonical root, link policy, and paths never to report (the store files).
#[derive(Clone, Debug)]
pub struct WalkScope {
    pub root: PathBuf,
    pub follow_links: bool,
    pub skip: Vec<PathBuf>,
}

impl WalkScope {
    /// Canonicalize `root`; fails if it is missing or not a readable directory.
    pub fn new(root: &Path, follow_links: bool) -> Result<Self> {
        Ok(Self {
            root: check_root_and_canonicalize(root)?,
            follow_links,
            skip: Vec::new(),
        })
    }

    /// Scope for a run: root from `opts`, store and side files skipped.
    pub fn for_opts(opts: &CatalogOpts) -> Result<Self> {
        let mut scope = Self::new(&opts.root, opts.follow_links)?;
        scope.skip = store_paths(&opts.db_path);
        Ok(scope)
    }

    pub fn is_skipped(&self, path: &Path) -> bool {
        self.skip.iter().any(|p| p == path)
    }

    /// Depth-first walk from the root (root included). Skipped paths are filtered out here.
    pub fn walk(&self) -> impl Iterator<Item = WalkOutcome> + '_ {
        walkdir::WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .into_iter()
            .map(to_outcome_walkdir)
            .filter(move |o| match o {
                WalkOutcome::Ok(entry) => !self.is_skipped(entry.path()),
                WalkOutcome::Err { .. } => true,
            })
    }
}
