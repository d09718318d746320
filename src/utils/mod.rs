pub mod config;
pub mod logger;
pub mod preferences;

pub use config::*;
pub use logger::{Colors, setup_logging};
pub use preferences::{Preferences, add_to_recent_paths, preferences_path};
