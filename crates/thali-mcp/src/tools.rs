//! MCP tool definitions and handlers
//!
//! Every call produces text content. Unknown tools and missing dishes are
//! ordinary results; only bad arguments and store failures set `isError`.

use crate::protocol::*;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use thali_core::{
    Database, DishConstraints, DishQuery, MealType, PreferenceUpdate, Retriever, SpiceLevel,
};

pub const SEARCH_FOOD: &str = "search_food";
pub const GET_FOOD_DETAILS: &str = "get_food_details";
pub const SAVE_PREFERENCES: &str = "save_preferences";

/// Preference store shared between in-flight requests.
///
/// rusqlite is blocking, so every store call runs on the blocking pool.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Text returned when a dish id is unknown
pub const NOT_FOUND_TEXT: &str = "Food not found";
/// Text returned after a successful preference save
pub const SAVED_TEXT: &str = "Preferences saved";

pub fn search_food_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_FOOD.to_string(),
        description: "Search for Indian vegetarian food based on query and preferences"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What kind of food to search for"
                },
                "allergies": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Allergens to exclude"
                },
                "spice_level": {
                    "type": "string",
                    "enum": SpiceLevel::KNOWN
                },
                "cuisine": {
                    "type": "string",
                    "description": "Preferred cuisine type"
                },
                "meal_type": {
                    "type": "string",
                    "enum": MealType::KNOWN
                }
            },
            "required": ["query"]
        }),
    }
}

pub fn get_food_details_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: GET_FOOD_DETAILS.to_string(),
        description: "Get detailed information about a specific food item".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "food_id": {
                    "type": "string",
                    "description": "The food item ID"
                }
            },
            "required": ["food_id"]
        }),
    }
}

pub fn save_preferences_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: SAVE_PREFERENCES.to_string(),
        description: "Save user dietary preferences".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": { "type": "string" },
                "dietary_type": { "type": "string" },
                "spice_level": { "type": "string" },
                "allergies": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "preferred_cuisines": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["user_id"]
        }),
    }
}

/// All tools, in listing order
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        search_food_tool_definition(),
        get_food_details_tool_definition(),
        save_preferences_tool_definition(),
    ]
}

#[derive(Debug, Deserialize)]
struct SearchFoodArgs {
    query: String,
    #[serde(default)]
    allergies: Option<Vec<String>>,
    #[serde(default)]
    spice_level: Option<SpiceLevel>,
    #[serde(default)]
    cuisine: Option<String>,
    #[serde(default)]
    meal_type: Option<MealType>,
}

impl SearchFoodArgs {
    fn into_query(self) -> DishQuery {
        let constraints = DishConstraints {
            allergens: self.allergies.unwrap_or_default().into_iter().collect(),
            dietary_type: None,
            cuisines: self.cuisine.into_iter().collect(),
            spice_level: self.spice_level,
            meal_type: self.meal_type,
        };
        DishQuery::new(self.query).with_constraints(constraints)
    }
}

#[derive(Debug, Deserialize)]
struct GetFoodDetailsArgs {
    food_id: String,
}

#[derive(Debug, Deserialize)]
struct SavePreferencesArgs {
    user_id: String,
    #[serde(default)]
    dietary_type: Option<String>,
    #[serde(default)]
    spice_level: Option<String>,
    #[serde(default)]
    allergies: Option<BTreeSet<String>>,
    #[serde(default)]
    preferred_cuisines: Option<BTreeSet<String>>,
}

impl SavePreferencesArgs {
    fn update(&self) -> PreferenceUpdate {
        PreferenceUpdate {
            dietary_type: self.dietary_type.clone(),
            spice_level: self.spice_level.clone(),
            allergens: self.allergies.clone(),
            preferred_cuisines: self.preferred_cuisines.clone(),
        }
    }
}

/// Validate arguments against the tool's declared shape
fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| anyhow::anyhow!("Invalid arguments for {}: {}", tool, e))
}

pub async fn handle_search_food(retriever: &Retriever, args: Value) -> Result<ToolResult> {
    let args: SearchFoodArgs = parse_args(SEARCH_FOOD, args)?;
    let query = args.into_query();

    let results = retriever.search(&query).await;
    Ok(ToolResult::text(serde_json::to_string_pretty(&results)?))
}

pub async fn handle_get_food_details(retriever: &Retriever, args: Value) -> Result<ToolResult> {
    let args: GetFoodDetailsArgs = parse_args(GET_FOOD_DETAILS, args)?;

    match retriever.get_by_id(&args.food_id).await {
        Some(dish) => Ok(ToolResult::text(serde_json::to_string_pretty(&dish)?)),
        None => Ok(ToolResult::text(NOT_FOUND_TEXT)),
    }
}

pub async fn handle_save_preferences(db: &SharedDatabase, args: Value) -> Result<ToolResult> {
    let args: SavePreferencesArgs = parse_args(SAVE_PREFERENCES, args)?;
    let update = args.update();
    let db = Arc::clone(db);

    tokio::task::spawn_blocking(move || {
        let db = db
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        db.save_preferences(&args.user_id, &update)?;
        Ok::<_, anyhow::Error>(())
    })
    .await??;

    Ok(ToolResult::text(SAVED_TEXT))
}

/// Route a call by tool name. Never fails: errors become text content.
pub async fn call_tool(
    retriever: &Retriever,
    db: &SharedDatabase,
    name: &str,
    args: Value,
) -> ToolResult {
    let result = match name {
        SEARCH_FOOD => handle_search_food(retriever, args).await,
        GET_FOOD_DETAILS => handle_get_food_details(retriever, args).await,
        SAVE_PREFERENCES => handle_save_preferences(db, args).await,
        _ => {
            tracing::warn!("Call to unknown tool '{}'", name);
            Ok(ToolResult::text(format!("Unknown tool: {}", name)))
        }
    };

    result.unwrap_or_else(|e| {
        tracing::warn!("Tool '{}' failed: {}", name, e);
        ToolResult::error(format!("Error: {}", e))
    })
}
