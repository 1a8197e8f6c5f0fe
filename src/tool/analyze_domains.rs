use super::base::{Tool, ToolContext, ToolError, ToolResult};
use crate::ranking::RankingService;
use crate::search::analysis::analyze_domains;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Domain distribution of a keyword's ranking
pub struct AnalyzeDomainsTool {
    service: Arc<RankingService>,
}

impl AnalyzeDomainsTool {
    pub fn new(service: Arc<RankingService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeDomainsParams {
    query: String,
}

#[async_trait::async_trait]
impl Tool for AnalyzeDomainsTool {
    fn id(&self) -> &str {
        "analyze_domains"
    }

    fn description(&self) -> &str {
        "Analyze domain distribution from search results. Runs a ranking search for the \
         keyword (consumes quota like search_ranking) and counts results per domain."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The search keyword to analyze"
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
        let params: AnalyzeDomainsParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let options = self.service.options(Vec::new(), Vec::new());
        let report = self
            .service
            .rank(&params.query, &options, ctx.daily_limit)
            .await?;
        let domains = analyze_domains(&report.results);

        ToolResult::json(
            format!("Domain analysis: {}", report.query),
            &json!({
                "query": report.query,
                "totalResults": report.total_results,
                "domains": &domains,
            }),
        )
    }
}
