mod common;

use common::{FakeProvider, Harness};
use rankcheck::tool::base::Tool;
use rankcheck::tool::estimate_cost::EstimateCostTool;
use rankcheck::tool::search_history::SearchHistoryTool;
use rankcheck::tool::ToolRegistry;
use serde_json::{json, Value};

fn registry() -> ToolRegistry {
    let harness = Harness::new(FakeProvider::with_results(Vec::new()));
    ToolRegistry::new(harness.service.clone())
}

#[test]
fn test_all_tools_registered() {
    let registry = registry();

    assert_eq!(
        registry.list_names(),
        vec![
            "analyze_domains",
            "estimate_cost",
            "get_quota",
            "job_search",
            "search_history",
            "search_ranking",
        ]
    );
}

#[test]
fn test_search_ranking_tool_registered() {
    let registry = registry();
    let tool = registry.get("search_ranking");

    assert!(tool.is_some(), "search_ranking tool should be registered");

    let tool = tool.unwrap();
    assert_eq!(tool.id(), "search_ranking");
    assert!(tool.description().contains("quota"));
    assert_eq!(tool.input_schema()["required"], json!(["query"]));
}

#[test]
fn test_tool_schemas_are_objects() {
    let registry = registry();
    assert_eq!(registry.tools().count(), 6);

    for tool in registry.tools() {
        assert!(!tool.description().is_empty(), "{} has a description", tool.id());
        assert_eq!(tool.input_schema()["type"], "object");
    }
}

#[test]
fn test_unknown_tool_not_found() {
    assert!(registry().get("web_fetch").is_none());
}

#[tokio::test]
async fn test_estimate_cost_tool() {
    let harness = Harness::new(FakeProvider::with_results(Vec::new()));
    let tool = EstimateCostTool;

    let output = tool
        .execute(json!({"queries": 150}), &harness.context(50))
        .await
        .unwrap();
    let json: Value = serde_json::from_str(&output.output).unwrap();
    assert_eq!(json["totalQueries"], 150);
    assert_eq!(json["freeQueries"], 100);
    assert_eq!(json["paidQueries"], 50);
    assert_eq!(json["estimatedCost"], "$0.25");
    assert_eq!(json["monthlyCost"], "$7.50");

    let rounded = tool
        .execute(json!({"queries": 100.2}), &harness.context(50))
        .await
        .unwrap();
    let json: Value = serde_json::from_str(&rounded.output).unwrap();
    assert_eq!(json["totalQueries"], 101);

    let err = tool
        .execute(json!({"queries": -1}), &harness.context(50))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("non-negative"));
}

#[tokio::test]
async fn test_search_history_tool_lists_and_clears() {
    let harness = Harness::new(FakeProvider::with_results(vec![common::result(
        "https://example.com/",
        "example.com",
        "Example",
    )]));
    let ctx = harness.context(50);

    harness
        .service
        .rank("first", &harness.service.options(Vec::new(), Vec::new()), 50)
        .await
        .unwrap();
    harness
        .service
        .rank("second", &harness.service.options(Vec::new(), Vec::new()), 50)
        .await
        .unwrap();

    let tool = SearchHistoryTool::new(harness.history.clone());
    let output = tool.execute(json!({"limit": 1}), &ctx).await.unwrap();
    let json: Value = serde_json::from_str(&output.output).unwrap();
    assert_eq!(json["totalSearches"], 2);
    assert_eq!(json["totalQueries"], 4);
    assert_eq!(json["searches"].as_array().unwrap().len(), 1);
    assert_eq!(json["searches"][0]["query"], "second");

    let id = json["searches"][0]["id"].as_str().unwrap().to_string();
    let detail = tool.execute(json!({"id": id}), &ctx).await.unwrap();
    let entry: Value = serde_json::from_str(&detail.output).unwrap();
    assert_eq!(entry["query"], "second");
    assert_eq!(entry["results"][0]["url"], "https://example.com/");
    assert_eq!(entry["queriesUsed"], 2);

    let missing = tool.execute(json!({"id": "nope"}), &ctx).await.unwrap_err();
    assert!(missing.to_string().contains("No search with id nope"));

    let cleared = tool.execute(json!({"clear": true}), &ctx).await.unwrap();
    assert_eq!(cleared.output, "Search history cleared.");
    assert_eq!(harness.history.stats().total_searches, 0);
}
