//! Path and metadata utilities

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::utils::config::STORE_SIDE_SUFFIXES;

/// Canonicalize the crawl root and make sure it is a directory we can list.
pub fn check_root_and_canonicalize(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("canonicalize root {}", path.display()))?;
    let meta = std::fs::metadata(&root).context("read root metadata")?;
    if !meta.is_dir() {
        anyhow::bail!("Root is not a directory: {}", root.display());
    }
    std::fs::read_dir(&root).with_context(|| format!("list root {}", root.display()))?;
    Ok(root)
}

/// Path as stored in the catalog (lossy UTF-8).
pub fn path_to_db_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Parent directory as stored in the catalog; empty for a filesystem root.
pub fn parent_path_string(path: &Path) -> String {
    path.parent().map(path_to_db_string).unwrap_or_default()
}

/// Lowercase dot-prefixed extension of the final component, or empty.
/// Dotfiles (`.bashrc`) and trailing dots (`name.`) have no extension.
pub fn extension_of(path: &Path) -> String {
    match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
        Some(e) if !e.is_empty() => format!(".{e}"),
        _ => String::new(),
    }
}

pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// RFC 3339 UTC at second precision, e.g. `2024-01-02T03:04:05Z`.
pub fn format_mtime_utc(t: SystemTime) -> String {
    DateTime::<Utc>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The store and its SQLite side files, so a store inside the crawled root is never cataloged.
/// Paths are canonicalized through the store's parent so they compare with walk output.
pub fn store_paths(db_path: &Path) -> Vec<PathBuf> {
    let Some(name) = db_path.file_name() else {
        return Vec::new();
    };
    let parent = match db_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let Ok(parent) = parent.canonicalize() else {
        return Vec::new();
    };
    let base = parent.join(name);
    let mut paths = Vec::with_capacity(STORE_SIDE_SUFFIXES.len() + 1);
    for suffix in STORE_SIDE_SUFFIXES {
        let mut side = base.clone().into_os_string();
        side.push(suffix);
        paths.push(PathBuf::from(side));
    }
    paths.push(base);
    paths
}
