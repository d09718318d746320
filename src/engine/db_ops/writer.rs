//! Batched upserts: buffer up to one batch of rows, then write them in a single transaction.

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};

use crate::{FileRecord, FolderRecord};

use super::{UPSERT_FILE_SQL, UPSERT_FOLDER_SQL};

/// One pending write.
#[derive(Clone, Debug)]
pub enum Upsert {
    Folder(FolderRecord),
    File(FileRecord),
}

impl Upsert {
    pub fn path(&self) -> &str {
        match self {
            Upsert::Folder(f) => &f.path,
            Upsert::File(f) => &f.abs_path,
        }
    }
}

/// Collects upserts and commits them `batch_size` at a time.
///
/// A failed batch rolls back as a whole; batches committed before it stay in the store.
pub struct BatchWriter<'c> {
    conn: &'c mut Connection,
    pending: Vec<Upsert>,
    batch_size: usize,
    committed: u64,
}

impl<'c> BatchWriter<'c> {
    pub fn new(conn: &'c mut Connection, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            conn,
            pending: Vec::with_capacity(batch_size),
            batch_size,
            committed: 0,
        }
    }

    pub fn push(&mut self, upsert: Upsert) {
        self.pending.push(upsert);
    }

    /// True once a full batch is waiting; the caller flushes and reports progress.
    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.batch_size
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Rows committed so far by this writer.
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// Commit everything pending in one transaction. Returns the number of rows written.
    pub fn flush(&mut self) -> Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction().context("begin transaction")?;
        write_batch(&tx, &self.pending)?;
        tx.commit().context("commit transaction")?;
        let n = self.pending.len();
        self.committed += n as u64;
        self.pending.clear();
        Ok(n)
    }

    /// The underlying connection, e.g. for post-run index creation.
    pub fn conn(&self) -> &Connection {
        &*self.conn
    }
}

/// Execute every upsert inside `tx`. Any error leaves `tx` to roll back on drop.
fn write_batch(tx: &Transaction<'_>, batch: &[Upsert]) -> Result<()> {
    let mut folder_stmt = tx
        .prepare_cached(UPSERT_FOLDER_SQL)
        .context("prepare folder upsert")?;
    let mut file_stmt = tx
        .prepare_cached(UPSERT_FILE_SQL)
        .context("prepare file upsert")?;
    for upsert in batch {
        match upsert {
            Upsert::Folder(f) => {
                folder_stmt
                    .execute((f.path.as_str(), f.parent_path.as_str(), f.mtime_utc.as_str()))
                    .with_context(|| format!("upsert folder {}", f.path))?;
            }
            Upsert::File(f) => {
                file_stmt
                    .execute((
                        f.abs_path.as_str(),
                        f.folder_path.as_str(),
                        f.name.as_str(),
                        f.ext.as_str(),
                        f.size as i64,
                        f.mtime_utc.as_str(),
                        f.mime.as_str(),
                        f.sha256.as_deref(),
                    ))
                    .with_context(|| format!("upsert file {}", f.abs_path))?;
            }
        }
    }
    Ok(())
}
