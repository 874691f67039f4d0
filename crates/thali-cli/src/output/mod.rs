//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use thali_core::{DishResult, UserPreferences};

/// Format options
pub struct FormatOptions {
    pub full: bool,
}

/// Format search results
pub fn format_dishes(results: &[DishResult], format: OutputFormat, options: &FormatOptions) -> String {
    match format {
        OutputFormat::Json => json::format_results(results),
        OutputFormat::Cli => terminal::format_results(results, options),
    }
}

/// Format a single dish
pub fn format_dish(dish: &DishResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_value(dish),
        OutputFormat::Cli => terminal::format_dish(dish),
    }
}

/// Format stored preferences
pub fn format_preferences(prefs: &UserPreferences, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_value(prefs),
        OutputFormat::Cli => terminal::format_preferences(prefs),
    }
}
