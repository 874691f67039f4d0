//! CLI command handlers

pub mod ask;
pub mod get;
pub mod prefs;
pub mod search;
