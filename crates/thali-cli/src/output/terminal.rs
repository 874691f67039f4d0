//! Terminal output formatter

use super::FormatOptions;
use thali_core::{DishResult, UserPreferences};

const DETAIL_FIELDS: &[(&str, &str)] = &[
    ("Region", "region"),
    ("Cuisine", "cuisine"),
    ("Meal", "meal_type"),
    ("Spice", "spice_level"),
    ("Tags", "tags"),
    ("Allergens", "allergens"),
];

fn title(dish: &DishResult) -> String {
    dish.meta_str("name").unwrap_or_else(|| dish.id.clone())
}

pub fn format_results(results: &[DishResult], options: &FormatOptions) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut output = String::new();

    for result in results {
        let score_pct = (result.score.unwrap_or(0.0).clamp(0.0, 1.0) * 100.0) as u32;
        output.push_str(&format!("{:>3}% {} #{}\n", score_pct, title(result), result.id));

        if options.full {
            for line in result.content.lines() {
                output.push_str(&format!("  {}\n", line));
            }
        } else if let Some(first) = result.content.lines().next() {
            output.push_str(&format!("  {}\n", first));
        }
    }

    output
}

pub fn format_dish(dish: &DishResult) -> String {
    let mut output = format!("{} #{}\n", title(dish), dish.id);

    for (label, key) in DETAIL_FIELDS {
        if let Some(value) = dish.meta_str(key) {
            output.push_str(&format!("{:<10} {}\n", format!("{}:", label), value));
        }
    }

    output.push('\n');
    output.push_str(&dish.content);
    output.push('\n');
    output
}

pub fn format_preferences(prefs: &UserPreferences) -> String {
    let list = |items: &std::collections::BTreeSet<String>| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };

    format!(
        "User:      {}\nDiet:      {}\nSpice:     {}\nAllergens: {}\nCuisines:  {}\nUpdated:   {}\n",
        prefs.user_id,
        prefs.dietary_type.as_deref().unwrap_or("-"),
        prefs.spice_level.as_deref().unwrap_or("-"),
        list(&prefs.allergens),
        list(&prefs.preferred_cuisines),
        prefs.updated_at.as_deref().unwrap_or("-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dosa() -> DishResult {
        DishResult {
            id: "masala-dosa".to_string(),
            content: "Crisp dosa stuffed with potato masala\nServed with sambar".to_string(),
            metadata: serde_json::from_value(json!({
                "name": "Masala Dosa",
                "region": "Karnataka",
                "allergens": ["mustard"]
            }))
            .unwrap(),
            score: Some(0.875),
        }
    }

    #[test]
    fn test_result_line() {
        let out = format_results(&[dosa()], &FormatOptions { full: false });
        assert_eq!(
            out,
            " 87% Masala Dosa #masala-dosa\n  Crisp dosa stuffed with potato masala\n"
        );
    }

    #[test]
    fn test_full_shows_every_line() {
        let out = format_results(&[dosa()], &FormatOptions { full: true });
        assert!(out.contains("  Served with sambar\n"));
    }

    #[test]
    fn test_dish_details() {
        let out = format_dish(&dosa());
        assert!(out.starts_with("Masala Dosa #masala-dosa\n"));
        assert!(out.contains("Region:    Karnataka\n"));
        assert!(out.contains("Allergens: mustard\n"));
        assert!(!out.contains("Spice:"));
    }
}
