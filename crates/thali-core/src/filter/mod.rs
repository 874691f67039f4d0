//! Filter compiler
//!
//! Turns [`DishConstraints`] into a [`Predicate`] tree understood by the
//! vector index. The tree renders to Chroma `where` JSON and can also be
//! evaluated in-process against a metadata map.

mod constraints;

pub use constraints::{DishConstraints, DishQuery, MealType, SpiceLevel, DEFAULT_LIMIT};

use crate::index::Metadata;
use serde_json::{json, Value};

/// Metadata field listing a dish's allergens
pub const ALLERGENS_FIELD: &str = "allergens";
/// Metadata field listing dietary tags
pub const TAGS_FIELD: &str = "tags";
pub const SPICE_LEVEL_FIELD: &str = "spice_level";
pub const MEAL_TYPE_FIELD: &str = "meal_type";

/// Boolean predicate over dish metadata
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals the value exactly
    Eq { field: String, value: String },
    /// Field contains the value
    Contains { field: String, value: String },
    /// Field does not contain the value
    NotContains { field: String, value: String },
    /// All children hold
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: &str, value: impl Into<String>) -> Self {
        Self::Eq {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn contains(field: &str, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn not_contains(field: &str, value: impl Into<String>) -> Self {
        Self::NotContains {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// Render as a Chroma `where` clause
    pub fn to_where(&self) -> Value {
        match self {
            Self::Eq { field, value } => json!({ field: value }),
            Self::Contains { field, value } => json!({ field: { "$contains": value } }),
            Self::NotContains { field, value } => json!({ field: { "$not_contains": value } }),
            Self::And(children) => {
                let clauses: Vec<Value> = children.iter().map(Predicate::to_where).collect();
                json!({ "$and": clauses })
            }
        }
    }

    /// Evaluate against a metadata map.
    ///
    /// Containment is element membership for arrays and substring search for
    /// strings. A missing field never equals or contains anything.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        match self {
            Self::Eq { field, value } => metadata
                .get(field)
                .is_some_and(|v| scalar_eq(v, value)),
            Self::Contains { field, value } => metadata
                .get(field)
                .is_some_and(|v| value_contains(v, value)),
            Self::NotContains { field, value } => !metadata
                .get(field)
                .is_some_and(|v| value_contains(v, value)),
            Self::And(children) => children.iter().all(|p| p.matches(metadata)),
        }
    }

    /// Number of leaf predicates
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::And(children) => children.iter().map(Predicate::leaf_count).sum(),
            _ => 1,
        }
    }
}

fn scalar_eq(actual: &Value, expected: &str) -> bool {
    match actual {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string() == expected,
        _ => false,
    }
}

fn value_contains(actual: &Value, needle: &str) -> bool {
    match actual {
        Value::String(s) => s.contains(needle),
        Value::Array(items) => items.iter().any(|item| scalar_eq(item, needle)),
        _ => false,
    }
}

/// Compile constraints into an index filter.
///
/// Returns `None` when nothing is constrained, the bare predicate when
/// exactly one applies, and a conjunction otherwise. Cuisines are not
/// compiled.
pub fn compile(constraints: &DishConstraints) -> Option<Predicate> {
    let mut predicates: Vec<Predicate> = constraints
        .allergens
        .iter()
        .map(|allergen| Predicate::not_contains(ALLERGENS_FIELD, allergen.as_str()))
        .collect();

    if let Some(dietary) = constraints.active_dietary_type() {
        predicates.push(Predicate::contains(TAGS_FIELD, dietary));
    }

    if let Some(ref spice) = constraints.spice_level {
        if !spice.is_recognized() {
            tracing::warn!("Unrecognized spice level '{}' will match no dishes", spice);
        }
        predicates.push(Predicate::eq(SPICE_LEVEL_FIELD, spice.as_str()));
    }

    if let Some(ref meal) = constraints.meal_type {
        if !meal.is_recognized() {
            tracing::warn!("Unrecognized meal type '{}' will match no dishes", meal);
        }
        predicates.push(Predicate::eq(MEAL_TYPE_FIELD, meal.as_str()));
    }

    match predicates.len() {
        0 => None,
        1 => predicates.pop(),
        _ => Some(Predicate::And(predicates)),
    }
}

impl DishConstraints {
    /// Compile into an index filter; see [`compile`]
    pub fn compile(&self) -> Option<Predicate> {
        compile(self)
    }

    pub fn is_empty(&self) -> bool {
        self.compile().is_none()
    }
}
