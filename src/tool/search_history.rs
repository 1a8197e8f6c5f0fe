use super::base::{Tool, ToolContext, ToolError, ToolResult};
use crate::history::HistoryStore;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 10;

/// Lists recent ranking searches and lifetime totals
pub struct SearchHistoryTool {
    history: Arc<HistoryStore>,
}

impl SearchHistoryTool {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self { history }
    }
}

#[derive(Debug, Deserialize)]
struct SearchHistoryParams {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    clear: bool,
}

#[async_trait::async_trait]
impl Tool for SearchHistoryTool {
    fn id(&self) -> &str {
        "search_history"
    }

    fn description(&self) -> &str {
        "Show recent ranking searches (newest first) with total searches and queries used. \
         Pass id to get the stored results of one search, or clear=true to delete the history."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Return the full stored results of one search by id"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of searches to list (default 10)"
                },
                "clear": {
                    "type": "boolean",
                    "description": "Delete the stored history instead of listing it"
                }
            }
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: SearchHistoryParams = if params.is_null() {
            SearchHistoryParams { id: None, limit: None, clear: false }
        } else {
            serde_json::from_value(params).map_err(|e| ToolError::InvalidParams(e.to_string()))?
        };

        if params.clear {
            self.history.clear();
            return Ok(ToolResult::new("Search history", "Search history cleared."));
        }

        if let Some(id) = params.id.as_deref() {
            let entry = self
                .history
                .find(id)
                .ok_or_else(|| ToolError::InvalidParams(format!("No search with id {}", id)))?;
            return ToolResult::json(format!("Search history: {}", entry.query), &entry);
        }

        let stats = self.history.stats();
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(1);

        let searches: Vec<_> = stats
            .search_history
            .iter()
            .take(limit)
            .map(|entry| {
                json!({
                    "id": entry.id,
                    "query": entry.query,
                    "timestamp": entry.timestamp,
                    "queriesUsed": entry.queries_used,
                    "resultCount": entry.results.len(),
                })
            })
            .collect();

        ToolResult::json(
            "Search history",
            &json!({
                "totalSearches": stats.total_searches,
                "totalQueries": stats.total_queries,
                "lastSearch": stats.last_search,
                "searches": searches,
            }),
        )
    }
}
