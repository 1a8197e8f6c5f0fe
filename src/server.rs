//! MCP tool server on stdio, built on `rmcp`.
//!
//! Protocol framing, `initialize` and JSON-RPC error handling are left to
//! rmcp; this module maps `tools/list` and `tools/call` onto the
//! [`ToolRegistry`]. Tool failures are reported inside the result
//! (`isError: true`), not as protocol errors.

use anyhow::{Context, Result};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler, ServiceExt};
use std::sync::Arc;

use crate::tool::base::ToolContext;
use crate::tool::ToolRegistry;

pub const SERVER_NAME: &str = "google-search-ranking";

/// Serves the tool registry to one MCP client
#[derive(Clone)]
pub struct ToolServer {
    registry: Arc<ToolRegistry>,
    ctx: ToolContext,
}

impl ToolServer {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self {
            registry: Arc::new(registry),
            ctx,
        }
    }

    /// Serve stdin/stdout until the client disconnects
    pub async fn run_stdio(self) -> Result<()> {
        tracing::info!(
            server = SERVER_NAME,
            tier = %self.ctx.tier,
            daily_limit = self.ctx.daily_limit,
            tools = ?self.registry.list_names(),
            "tool server running on stdio"
        );

        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .context("Failed to start MCP server")?;
        let reason = service.waiting().await.context("MCP server task failed")?;

        tracing::info!(reason = ?reason, "tool server stopped");
        Ok(())
    }

    /// Registry tools as MCP tool definitions
    pub fn tool_definitions(&self) -> Vec<McpTool> {
        self.registry
            .tools()
            .map(|tool| {
                McpTool::new(
                    tool.id().to_string(),
                    tool.description().to_string(),
                    Arc::new(schema_object(tool.input_schema())),
                )
            })
            .collect()
    }

    /// Run one tool for the configured caller
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let Some(tool) = self.registry.get(name) else {
            tracing::warn!(tool = %name, "unknown tool requested");
            return tool_error(&format!("Unknown tool: {}", name));
        };

        let params = serde_json::Value::Object(arguments.unwrap_or_default());
        let ctx = self.ctx.for_request(uuid::Uuid::new_v4().to_string());

        match tool.execute(params, &ctx).await {
            Ok(result) => {
                tracing::debug!(
                    tool = %name,
                    request_id = %ctx.request_id,
                    title = %result.title,
                    "tool call succeeded"
                );
                CallToolResult::success(vec![Content::text(result.output)])
            }
            Err(e) => {
                tracing::warn!(tool = %name, request_id = %ctx.request_id, error = %e, "tool call failed");
                tool_error(&e.to_string())
            }
        }
    }
}

impl ServerHandler for ToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(format!(
                "Google search ranking tools. Searches consume the daily API quota \
                 ({} units for tier {}); check it with get_quota.",
                self.ctx.daily_limit, self.ctx.tier
            )),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tool_definitions(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call(&request.name, request.arguments).await)
    }
}

fn schema_object(schema: serde_json::Value) -> JsonObject {
    match schema {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

fn tool_error(message: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", message))])
}
