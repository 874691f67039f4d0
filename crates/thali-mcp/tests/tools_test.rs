//! Integration tests for MCP tool dispatch

mod common;

use common::{memory_db, sample_index, sample_retriever};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use thali_core::{DishResult, Retriever};
use thali_mcp::call_tool;
use thali_mcp::tools::{NOT_FOUND_TEXT, SAVED_TEXT};

#[tokio::test]
async fn test_unknown_tool_is_text() {
    let db = memory_db();
    let result = call_tool(&sample_retriever(), &db, "delete_everything", json!({})).await;

    assert_eq!(result.text_content(), "Unknown tool: delete_everything");
    assert_eq!(result.is_error, None);
}

#[tokio::test]
async fn test_get_food_details_not_found() {
    let db = memory_db();
    let result = call_tool(
        &sample_retriever(),
        &db,
        "get_food_details",
        json!({"food_id": "no-such-dish"}),
    )
    .await;

    assert_eq!(result.text_content(), NOT_FOUND_TEXT);
}

#[tokio::test]
async fn test_get_food_details_found() {
    let db = memory_db();
    let result = call_tool(
        &sample_retriever(),
        &db,
        "get_food_details",
        json!({"food_id": "kaju-katli"}),
    )
    .await;

    let dish: DishResult = serde_json::from_str(&result.text_content()).unwrap();
    assert_eq!(dish.id, "kaju-katli");
    assert_eq!(dish.content, "Cashew fudge with silver leaf");
    assert_eq!(dish.score, None);
}

#[tokio::test]
async fn test_search_food_returns_json_results() {
    let db = memory_db();
    let result = call_tool(
        &sample_retriever(),
        &db,
        "search_food",
        json!({"query": "something sweet", "allergies": ["cashew"]}),
    )
    .await;

    let dishes: Vec<DishResult> = serde_json::from_str(&result.text_content()).unwrap();
    assert_eq!(dishes.len(), 1);
    assert_eq!(dishes[0].id, "chana-masala");
    assert!((dishes[0].score.unwrap() - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_search_food_with_index_down_is_empty_list() {
    let db = memory_db();
    let index = sample_index();
    index.down.store(true, Ordering::SeqCst);
    let retriever = Retriever::new(Arc::new(index));

    let result = call_tool(&retriever, &db, "search_food", json!({"query": "dal"})).await;

    let parsed: Value = serde_json::from_str(&result.text_content()).unwrap();
    assert_eq!(parsed, json!([]));
    assert_eq!(result.is_error, None);
}

#[tokio::test]
async fn test_search_food_missing_query_is_error_text() {
    let db = memory_db();
    let result = call_tool(&sample_retriever(), &db, "search_food", json!({})).await;

    assert_eq!(result.is_error, Some(true));
    assert!(result.text_content().starts_with("Error: "));
}

#[tokio::test]
async fn test_save_preferences_partial_update() {
    let db = memory_db();
    let retriever = sample_retriever();

    let first = call_tool(
        &retriever,
        &db,
        "save_preferences",
        json!({
            "user_id": "asha",
            "dietary_type": "jain",
            "allergies": ["peanut", "sesame"],
            "preferred_cuisines": ["gujarati"]
        }),
    )
    .await;
    assert_eq!(first.text_content(), SAVED_TEXT);

    let second = call_tool(
        &retriever,
        &db,
        "save_preferences",
        json!({"user_id": "asha", "spice_level": "mild"}),
    )
    .await;
    assert_eq!(second.text_content(), SAVED_TEXT);

    let prefs = db.lock().unwrap().get_preferences("asha").unwrap().unwrap();
    assert_eq!(prefs.spice_level.as_deref(), Some("mild"));
    assert_eq!(prefs.dietary_type.as_deref(), Some("jain"));
    assert_eq!(
        prefs.allergens.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["peanut", "sesame"]
    );
    assert!(prefs.preferred_cuisines.contains("gujarati"));
}

#[tokio::test]
async fn test_save_preferences_requires_user_id() {
    let db = memory_db();
    let result = call_tool(
        &sample_retriever(),
        &db,
        "save_preferences",
        json!({"spice_level": "hot"}),
    )
    .await;

    assert_eq!(result.is_error, Some(true));
    assert!(result.text_content().contains("user_id"));
}
