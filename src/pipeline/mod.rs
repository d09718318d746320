//! Pipeline components: walk, estimate, crawl-persist, threaded runner.

pub mod crawl;
pub mod estimate;
pub mod runner;
pub mod walk;

pub use crawl::{CrawlParams, catalog_dir, crawl_into, file_record, folder_record};
pub use estimate::{estimate, estimate_file_count, estimate_until_cancelled};
pub use runner::{CatalogHandle, spawn_catalog, spawn_catalog_with_cancel};
pub use walk::{WalkOutcome, WalkScope, to_outcome_walkdir};
