use super::base::{Tool, ToolContext, ToolError, ToolResult};
use crate::search::analysis::estimate_cost;
use serde::Deserialize;
use serde_json::json;

/// Estimates API spend for a daily query volume
pub struct EstimateCostTool;

#[derive(Debug, Deserialize)]
struct EstimateCostParams {
    queries: f64,
}

#[async_trait::async_trait]
impl Tool for EstimateCostTool {
    fn id(&self) -> &str {
        "estimate_cost"
    }

    fn description(&self) -> &str {
        "Estimate the cost for a given number of queries per day \
         (first 100/day free, then $5 per 1000 queries)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "queries": {
                    "type": "number",
                    "minimum": 0,
                    "description": "Number of queries to estimate"
                }
            },
            "required": ["queries"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: EstimateCostParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        if !params.queries.is_finite() || params.queries < 0.0 {
            return Err(ToolError::InvalidParams(
                "queries must be a non-negative number".into(),
            ));
        }

        // Partial queries are still billed.
        let queries = params.queries.ceil() as u64;
        let estimate = estimate_cost(queries);

        ToolResult::json(format!("Cost estimate: {} queries", queries), &estimate)
    }
}
