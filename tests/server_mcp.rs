//! Integration tests for the MCP tool server

mod common;

use common::{result, FakeProvider, Harness};
use rankcheck::server::{ToolServer, SERVER_NAME};
use rankcheck::tool::ToolRegistry;
use rmcp::model::CallToolRequestParam;
use rmcp::{ServerHandler, ServiceExt};
use serde_json::{json, Value};

fn server(harness: &Harness, daily_limit: u64) -> ToolServer {
    ToolServer::new(
        ToolRegistry::new(harness.service.clone()),
        harness.context(daily_limit),
    )
}

fn harness() -> Harness {
    Harness::new(FakeProvider::with_results(vec![
        result("https://alpha.com/", "alpha.com", "Alpha"),
        result("https://beta.com/", "beta.com", "Beta"),
    ]))
}

fn arguments(value: Value) -> Option<rmcp::model::JsonObject> {
    value.as_object().cloned()
}

/// Text of the first content item plus the error flag
fn text_of(result: &rmcp::model::CallToolResult) -> (String, bool) {
    let json = serde_json::to_value(result).unwrap();
    (
        json["content"][0]["text"].as_str().unwrap().to_string(),
        json["isError"].as_bool().unwrap_or(false),
    )
}

#[test]
fn test_server_info() {
    let harness = harness();
    let info = serde_json::to_value(server(&harness, 50).get_info()).unwrap();

    assert_eq!(info["protocolVersion"], "2024-11-05");
    assert_eq!(info["serverInfo"]["name"], SERVER_NAME);
    assert!(info["capabilities"]["tools"].is_object());
    assert!(info["instructions"].as_str().unwrap().contains("50 units"));
}

#[test]
fn test_tool_definitions() {
    let harness = harness();
    let tools = server(&harness, 50).tool_definitions();
    assert_eq!(tools.len(), 6);

    let definitions: Vec<Value> = tools
        .iter()
        .map(|tool| serde_json::to_value(tool).unwrap())
        .collect();
    let search = definitions
        .iter()
        .find(|d| d["name"] == "search_ranking")
        .expect("search_ranking listed");
    assert_eq!(search["inputSchema"]["type"], "object");
    assert_eq!(search["inputSchema"]["required"], json!(["query"]));
    assert!(definitions.iter().any(|d| d["name"] == "get_quota"));
}

#[tokio::test]
async fn test_call_success() {
    let harness = harness();
    let server = server(&harness, 50);

    let result = server
        .call("search_ranking", arguments(json!({"query": "alpha"})))
        .await;

    let (text, is_error) = text_of(&result);
    assert!(!is_error);
    let report: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["totalResults"], 2);
    assert_eq!(report["remainingQuota"], 48);
    assert_eq!(harness.ledger.record().queries_used, 2);
}

#[tokio::test]
async fn test_call_quota_exhausted_is_tool_error() {
    let harness = harness();
    let server = server(&harness, 10);
    harness.ledger.record_consumption("earlier", 10).unwrap();

    let result = server
        .call("search_ranking", arguments(json!({"query": "alpha"})))
        .await;

    let (text, is_error) = text_of(&result);
    assert!(is_error);
    assert!(text.starts_with("Error: Daily quota exhausted"));
    assert!(text.contains("時間"));
    assert_eq!(harness.provider.call_count(), 0);
}

#[tokio::test]
async fn test_call_unknown_tool() {
    let harness = harness();
    let result = server(&harness, 50).call("nope", None).await;

    let (text, is_error) = text_of(&result);
    assert!(is_error);
    assert_eq!(text, "Error: Unknown tool: nope");
}

#[tokio::test]
async fn test_call_without_arguments() {
    let harness = harness();
    let result = server(&harness, 50).call("get_quota", None).await;

    let (text, is_error) = text_of(&result);
    assert!(!is_error);
    let quota: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(quota["quota"]["limit"], 50);
    assert_eq!(quota["quota"]["remaining"], 50);
}

#[tokio::test]
async fn test_client_round_trip_over_duplex() {
    let harness = harness();
    let server = server(&harness, 50);
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);

    tokio::spawn(async move {
        if let Ok(running) = server.serve(tokio::io::split(server_io)).await {
            let _ = running.waiting().await;
        }
    });

    let client = ().serve(tokio::io::split(client_io)).await.unwrap();

    let tools = client.list_tools(Default::default()).await.unwrap();
    assert_eq!(tools.tools.len(), 6);

    let result = client
        .call_tool(CallToolRequestParam {
            name: "search_ranking".into(),
            arguments: arguments(json!({"query": "beta"})),
        })
        .await
        .unwrap();
    let (text, is_error) = text_of(&result);
    assert!(!is_error);
    let report: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["query"], "beta");
    assert_eq!(harness.ledger.record().queries_used, 2);

    client.cancel().await.unwrap();
}
