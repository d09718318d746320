//! Engine module: per-entry transforms, store access, CLI plumbing.

pub mod arg_parser;
pub mod cli;
pub mod db_ops;
pub mod ext_filter;
pub mod hashing;
pub mod mime;
pub mod progress;
pub mod telemetry;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{ResolvedRun, handle_run, resolve_run};
pub use db_ops::{
    BatchWriter, Upsert, create_query_indexes, file_count, folder_count, init_schema, open_db,
    open_db_in_memory,
};
pub use ext_filter::ExtFilter;
pub use hashing::{hash_file, try_hash_file};
pub use mime::detect_mime;
pub use telemetry::{Telemetry, format_duration, format_speed};
pub use tools::{extension_of, format_mtime_utc, parent_path_string, path_to_db_string};
