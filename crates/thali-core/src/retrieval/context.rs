//! Grounding context rendering

use super::DishResult;

/// Metadata keys surfaced to the model, in display order
const CONTEXT_FIELDS: &[(&str, &str)] = &[
    ("region", "Region"),
    ("cuisine", "Cuisine"),
    ("meal_type", "Meal"),
    ("spice_level", "Spice"),
    ("tags", "Tags"),
    ("allergens", "Allergens"),
];

/// Render retrieved dishes as a text block for the prompt.
///
/// Returns `None` for an empty slice so the caller can skip grounding.
pub fn format_context(dishes: &[DishResult]) -> Option<String> {
    if dishes.is_empty() {
        return None;
    }

    let blocks: Vec<String> = dishes
        .iter()
        .enumerate()
        .map(|(i, dish)| {
            let name = dish.meta_str("name").unwrap_or_else(|| dish.id.clone());
            let mut block = format!("{}. {} [{}]\n", i + 1, name, dish.id);

            for (key, label) in CONTEXT_FIELDS {
                if let Some(value) = dish.meta_str(key) {
                    block.push_str(&format!("   {}: {}\n", label, value));
                }
            }

            block.push_str(&format!("   {}", dish.content.trim()));
            block
        })
        .collect();

    Some(blocks.join("\n\n"))
}
