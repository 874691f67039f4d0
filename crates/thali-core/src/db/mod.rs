//! Database layer for thali
//!
//! SQLite storage for per-user dietary preferences.

mod preferences;
mod schema;

pub use preferences::{PreferenceUpdate, UserPreferences};
pub use schema::Database;
use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        crate::config::StoreConfig::default().path
    }
}
