//! JSON output formatter

use serde::Serialize;
use thali_core::DishResult;

pub fn format_results(results: &[DishResult]) -> String {
    format_value(&results)
}

pub fn format_value<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
