//! Persisted CLI preferences: recent roots and the last-used settings.
//! Stored as JSON in the user's home directory. The pipeline never reads this; the CLI
//! resolves it into explicit [`CatalogOpts`](crate::CatalogOpts) before a run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::config::{MAX_RECENT_PATHS, PackagePaths};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub recent_paths: Vec<String>,
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
    #[serde(default)]
    pub last_root_path: String,
    #[serde(default)]
    pub last_output_dir: String,
    #[serde(default)]
    pub last_ext_filter: String,
    #[serde(default)]
    pub last_hash_setting: bool,
}

fn default_max_recent() -> usize {
    MAX_RECENT_PATHS
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            recent_paths: Vec::new(),
            max_recent: MAX_RECENT_PATHS,
            last_root_path: String::new(),
            last_output_dir: String::new(),
            last_ext_filter: String::new(),
            last_hash_setting: false,
        }
    }
}

impl Preferences {
    /// Load from `path`. Missing, unreadable, or malformed files give defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(s) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&s)
            .map_err(|e| log::warn!("{}: {}", path.display(), e))
            .unwrap_or_default()
    }

    /// Load from the default location (see [`preferences_path`]).
    pub fn load() -> Self {
        preferences_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("serialize preferences")?;
        std::fs::write(path, data)
            .with_context(|| format!("write preferences to {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = preferences_path().context("unable to determine preferences path")?;
        self.save_to(&path)
    }

    /// Record the settings of a run that is about to start.
    pub fn remember_run(&mut self, root: &str, output_dir: &str, ext_filter: &str, hash: bool) {
        self.recent_paths = add_to_recent_paths(&self.recent_paths, root, self.max_recent);
        self.last_root_path = root.to_string();
        self.last_output_dir = output_dir.to_string();
        self.last_ext_filter = ext_filter.to_string();
        self.last_hash_setting = hash;
    }
}

/// `~/.spcatalog_config.json`, or None when no home directory is known.
pub fn preferences_path() -> Option<PathBuf> {
    let dirs = directories::UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(PackagePaths::get().preferences_filename()),
    )
}

/// Move `new_path` to the front, dropping older duplicates, and cap at `max_recent`.
pub fn add_to_recent_paths(paths: &[String], new_path: &str, max_recent: usize) -> Vec<String> {
    if new_path.is_empty() {
        return paths.to_vec();
    }
    let mut result = Vec::with_capacity(paths.len() + 1);
    result.push(new_path.to_string());
    result.extend(paths.iter().filter(|p| p.as_str() != new_path).cloned());
    result.truncate(max_recent);
    result
}
