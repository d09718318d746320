//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    output_dir_name: String,
    preferences_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                output_dir_name: pkg.to_string(),
                preferences_filename: format!(".{pkg}_config.json"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Default output directory name, created under the user's home (`~/spcatalog`).
    pub fn output_dir_name(&self) -> &str {
        &self.output_dir_name
    }

    /// Catalog store filename inside the output directory.
    pub fn store_filename(&self) -> &str {
        STORE_FILENAME
    }

    /// Preferences file in the user's home directory.
    pub fn preferences_filename(&self) -> &str {
        &self.preferences_filename
    }
}

const STORE_FILENAME: &str = "catalog.db";

/// Suffixes SQLite appends to the store path for its side files.
pub const STORE_SIDE_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

// ---- Hashing ----

/// Hashing I/O buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Chunk size for streaming file content into the digest (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

// ---- MIME ----

/// Content types the classifier falls back to or overrides with.
pub struct MimeConsts;

impl MimeConsts {
    /// Outlook message files are not in the standard tables.
    pub const OUTLOOK_EXT: &'static str = ".msg";
    pub const OUTLOOK_MIME: &'static str = "application/vnd.ms-outlook";
    pub const DEFAULT_MIME: &'static str = "application/octet-stream";
    pub const TEXT_CHARSET_SUFFIX: &'static str = "; charset=utf-8";
}

// ---- Database ----

/// Upserts (folders and files together) per committed transaction.
pub const DB_INSERT_BATCH_SIZE: usize = 1000;

/// How long a write waits on a locked store before failing (ms).
pub const DB_BUSY_TIMEOUT_MS: u64 = 5_000;

// ---- Preferences ----

/// Recent roots remembered in preferences (matches 1-9 shortcuts).
pub const MAX_RECENT_PATHS: usize = 9;
