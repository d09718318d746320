//! Database operations: schema, open, batched upserts.

mod connection;
mod writer;

pub use connection::{
    create_query_indexes, file_count, folder_count, init_schema, open_db, open_db_in_memory,
};
pub use writer::{BatchWriter, Upsert};

/// WAL tuning pragmas. Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
        "#;

/// Schema for folders and files tables. Column names are fixed; other tools read these stores.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS folders (
    path        TEXT PRIMARY KEY,
    parent_path TEXT,
    mtime_utc   TEXT
);
CREATE TABLE IF NOT EXISTS files (
    abs_path    TEXT PRIMARY KEY,
    folder_path TEXT NOT NULL,
    name        TEXT NOT NULL,
    ext         TEXT,
    size        INTEGER,
    mtime_utc   TEXT,
    mime        TEXT,
    sha256      TEXT
);
"#;

/// Secondary indexes, created once a run completes.
pub(crate) const QUERY_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_files_ext ON files(ext);
CREATE INDEX IF NOT EXISTS idx_files_folder ON files(folder_path);
CREATE INDEX IF NOT EXISTS idx_files_mtime ON files(mtime_utc);
"#;

/// Upsert for folders: only the mtime changes on conflict.
pub(crate) const UPSERT_FOLDER_SQL: &str = r#"
INSERT INTO folders (path, parent_path, mtime_utc)
VALUES (?1, ?2, ?3)
ON CONFLICT(path) DO UPDATE SET mtime_utc = excluded.mtime_utc
"#;

/// Upsert for files: size/mtime/mime always overwrite; sha256 only when the new value is non-NULL.
pub(crate) const UPSERT_FILE_SQL: &str = r#"
INSERT INTO files (abs_path, folder_path, name, ext, size, mtime_utc, mime, sha256)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
ON CONFLICT(abs_path) DO UPDATE SET
    size = excluded.size,
    mtime_utc = excluded.mtime_utc,
    mime = excluded.mime,
    sha256 = COALESCE(excluded.sha256, files.sha256)
"#;
