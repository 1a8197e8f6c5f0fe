use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::quota::{QuotaError, QuotaTier};
use crate::ranking::RankingError;
use crate::search::SearchError;

/// Tool execution context - who is calling and what limit applies to them
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub session_id: String,
    pub request_id: String,
    pub tier: QuotaTier,
    /// Daily unit limit for this caller
    pub daily_limit: u64,
}

/// Tool execution result returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Human-readable title/summary
    pub title: String,
    /// Tool output content
    pub output: String,
}

impl ToolResult {
    pub fn new(title: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            output: output.into(),
        }
    }

    /// Result whose output is pretty-printed JSON
    pub fn json(title: impl Into<String>, value: &impl Serialize) -> Result<Self, ToolError> {
        let output = serde_json::to_string_pretty(value).map_err(|e| ToolError::Other(e.into()))?;
        Ok(Self::new(title, output))
    }
}

/// Tool execution errors
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RankingError> for ToolError {
    fn from(e: RankingError) -> Self {
        match e {
            RankingError::EmptyQuery => ToolError::InvalidParams("query cannot be empty".into()),
            RankingError::Quota(e) => ToolError::Quota(e),
            RankingError::Search(e) => ToolError::Search(e),
        }
    }
}

/// Base tool trait - all tools must implement this
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool identifier (e.g., "search_ranking", "get_quota")
    fn id(&self) -> &str;

    /// Human-readable description for the client
    fn description(&self) -> &str;

    /// JSON schema for tool parameters
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given parameters
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError>;
}
