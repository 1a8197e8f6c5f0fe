use crate::ranking::RankingService;
use crate::tool::base::{Tool, ToolContext, ToolError, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Search ranking tool - ranked Google results for one keyword
///
/// Each result page costs one quota unit; the search is refused up front when
/// the caller's remaining daily quota cannot cover every page.
pub struct SearchRankingTool {
    service: Arc<RankingService>,
}

impl SearchRankingTool {
    pub fn new(service: Arc<RankingService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Deserialize)]
struct SearchRankingParams {
    query: String,
    #[serde(default)]
    allowed_domains: Vec<String>,
    #[serde(default)]
    blocked_domains: Vec<String>,
}

#[async_trait]
impl Tool for SearchRankingTool {
    fn id(&self) -> &str {
        "search_ranking"
    }

    fn description(&self) -> &str {
        "Search Google and get ranking results for a specific keyword. \
         \n\n\
         Usage notes:\n\
         - Uses one API query per result page (2 by default, top 20 results)\n\
         - Refused when the daily quota is exhausted; the error says when it resets\n\
         - Use allowed_domains / blocked_domains to filter the ranking"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The search keyword or phrase"
                },
                "allowed_domains": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Only include search results from these domains (optional)"
                },
                "blocked_domains": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Never include search results from these domains (optional)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: SearchRankingParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let options = self
            .service
            .options(params.allowed_domains, params.blocked_domains);
        let report = self
            .service
            .rank(&params.query, &options, ctx.daily_limit)
            .await?;

        ToolResult::json(format!("Search ranking: {}", report.query), &report)
    }
}
