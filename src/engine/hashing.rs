//! File hashing utilities

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::utils::config::HashingConsts;

/// Stream `path` through SHA-256 in fixed-size chunks and return the lowercase hex digest.
pub fn try_hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::with_capacity(HashingConsts::HASH_READ_CHUNK_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    loop {
        let n = reader
            .read(&mut buffer)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Hash a file, or `None` if it cannot be opened or read. Never fails the run.
pub fn hash_file(path: &Path) -> Option<String> {
    match try_hash_file(path) {
        Ok(h) => Some(h),
        Err(e) => {
            log::debug!("hash skipped: {:#}", e);
            None
        }
    }
}
