//! Typed dietary and preference constraints

use crate::db::UserPreferences;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Default number of dishes returned by a search
pub const DEFAULT_LIMIT: usize = 5;

/// Spice level of a dish
///
/// Values outside the known scale are kept verbatim in `Unrecognized` and
/// compile to a literal match that no document carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpiceLevel {
    Mild,
    Medium,
    Spicy,
    ExtraSpicy,
    Unrecognized(String),
}

impl SpiceLevel {
    /// Values the index knows about
    pub const KNOWN: [&'static str; 4] = ["mild", "medium", "spicy", "extra_spicy"];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Mild => "mild",
            Self::Medium => "medium",
            Self::Spicy => "spicy",
            Self::ExtraSpicy => "extra_spicy",
            Self::Unrecognized(other) => other,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<&str> for SpiceLevel {
    fn from(value: &str) -> Self {
        match value {
            "mild" => Self::Mild,
            "medium" => Self::Medium,
            "spicy" => Self::Spicy,
            "extra_spicy" => Self::ExtraSpicy,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for SpiceLevel {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<SpiceLevel> for String {
    fn from(value: SpiceLevel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SpiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meal slot a dish is suited for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
    Unrecognized(String),
}

impl MealType {
    pub const KNOWN: [&'static str; 5] = ["breakfast", "lunch", "dinner", "snack", "dessert"];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::Dessert => "dessert",
            Self::Unrecognized(other) => other,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<&str> for MealType {
    fn from(value: &str) -> Self {
        match value {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "dinner" => Self::Dinner,
            "snack" => Self::Snack,
            "dessert" => Self::Dessert,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for MealType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<MealType> for String {
    fn from(value: MealType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured constraints applied alongside the semantic query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DishConstraints {
    /// Allergens the dish must not list
    #[serde(default)]
    pub allergens: BTreeSet<String>,

    /// Dietary tag the dish must carry (e.g. "vegan", "jain")
    #[serde(default)]
    pub dietary_type: Option<String>,

    /// Preferred cuisines. Carried for the caller; not part of the index filter.
    #[serde(default)]
    pub cuisines: BTreeSet<String>,

    #[serde(default)]
    pub spice_level: Option<SpiceLevel>,

    #[serde(default)]
    pub meal_type: Option<MealType>,
}

impl DishConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allergen(mut self, allergen: impl Into<String>) -> Self {
        self.allergens.insert(allergen.into());
        self
    }

    pub fn dietary_type(mut self, dietary_type: impl Into<String>) -> Self {
        self.dietary_type = Some(dietary_type.into());
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisines.insert(cuisine.into());
        self
    }

    pub fn spice_level(mut self, level: impl Into<SpiceLevel>) -> Self {
        self.spice_level = Some(level.into());
        self
    }

    pub fn meal_type(mut self, meal: impl Into<MealType>) -> Self {
        self.meal_type = Some(meal.into());
        self
    }

    /// Dietary tag, treating an empty string as absent
    pub(crate) fn active_dietary_type(&self) -> Option<&str> {
        self.dietary_type.as_deref().filter(|d| !d.is_empty())
    }

    /// Fill blanks from stored preferences.
    ///
    /// Allergens are unioned; every other field is only taken from the
    /// preferences when the request left it unset.
    pub fn with_preferences(mut self, prefs: &UserPreferences) -> Self {
        self.allergens.extend(prefs.allergens.iter().cloned());

        if self.active_dietary_type().is_none() {
            if let Some(ref dietary) = prefs.dietary_type {
                self.dietary_type = Some(dietary.clone());
            }
        }

        if self.spice_level.is_none() {
            self.spice_level = prefs.spice_level.as_deref().map(SpiceLevel::from);
        }

        if self.cuisines.is_empty() {
            self.cuisines = prefs.preferred_cuisines.clone();
        }

        self
    }
}

/// A semantic query plus its constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishQuery {
    pub text: String,
    #[serde(default)]
    pub constraints: DishConstraints,
    /// Forwarded to the index unchanged
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl DishQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            constraints: DishConstraints::default(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_constraints(mut self, constraints: DishConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_levels_parse() {
        assert_eq!(SpiceLevel::from("extra_spicy"), SpiceLevel::ExtraSpicy);
        assert_eq!(MealType::from("dessert"), MealType::Dessert);
        for value in SpiceLevel::KNOWN {
            assert!(SpiceLevel::from(value).is_recognized());
            assert_eq!(SpiceLevel::from(value).as_str(), value);
        }
    }

    #[test]
    fn test_unknown_level_kept_verbatim() {
        let level = SpiceLevel::from("volcanic");
        assert!(!level.is_recognized());
        assert_eq!(level.as_str(), "volcanic");

        // Case is not normalized
        assert_eq!(MealType::from("Lunch"), MealType::Unrecognized("Lunch".into()));
    }

    #[test]
    fn test_constraints_deserialize_from_strings() {
        let constraints: DishConstraints = serde_json::from_str(
            r#"{"allergens": ["peanut"], "spice_level": "mild", "meal_type": "brunch"}"#,
        )
        .unwrap();
        assert_eq!(constraints.spice_level, Some(SpiceLevel::Mild));
        assert_eq!(
            constraints.meal_type,
            Some(MealType::Unrecognized("brunch".to_string()))
        );
        assert!(constraints.allergens.contains("peanut"));
    }

    #[test]
    fn test_with_preferences_fills_blanks_only() {
        let prefs = UserPreferences {
            user_id: "u1".to_string(),
            dietary_type: Some("vegan".to_string()),
            spice_level: Some("mild".to_string()),
            allergens: ["dairy".to_string()].into_iter().collect(),
            preferred_cuisines: ["gujarati".to_string()].into_iter().collect(),
            updated_at: None,
        };

        let constraints = DishConstraints::new()
            .allergen("peanut")
            .spice_level("spicy")
            .with_preferences(&prefs);

        assert_eq!(constraints.allergens.len(), 2);
        assert_eq!(constraints.spice_level, Some(SpiceLevel::Spicy));
        assert_eq!(constraints.dietary_type.as_deref(), Some("vegan"));
        assert!(constraints.cuisines.contains("gujarati"));
    }

    #[test]
    fn test_query_defaults() {
        let query: DishQuery = serde_json::from_str(r#"{"text": "dosa"}"#).unwrap();
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.constraints, DishConstraints::default());
    }
}
