use super::base::{Tool, ToolContext, ToolError, ToolResult};
use crate::ranking::RankingService;
use crate::search::job_filter::{filter_job_results, sort_by_job_relevance};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Job-search mode: ranking search narrowed to companies' own hiring pages
pub struct JobSearchTool {
    service: Arc<RankingService>,
}

impl JobSearchTool {
    pub fn new(service: Arc<RankingService>) -> Self {
        Self { service }
    }
}

#[derive(Debug, Deserialize)]
struct JobSearchParams {
    query: String,
}

#[async_trait::async_trait]
impl Tool for JobSearchTool {
    fn id(&self) -> &str {
        "job_search"
    }

    fn description(&self) -> &str {
        "Search Google for job openings and keep only direct hiring pages of companies. \
         Job boards, staffing agencies, blogs and roundup articles are removed and the \
         remaining pages are sorted by how clearly they are job postings. Consumes quota \
         like search_ranking."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Job search keywords, e.g. \"Rust エンジニア 採用\""
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
        let params: JobSearchParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let options = self.service.options(Vec::new(), Vec::new());
        let report = self
            .service
            .rank(&params.query, &options, ctx.daily_limit)
            .await?;

        let searched = report.total_results;
        let mut jobs = filter_job_results(report.results);
        sort_by_job_relevance(&mut jobs);

        tracing::debug!(query = %report.query, searched, kept = jobs.len(), "job search filtered");

        ToolResult::json(
            format!("Job search: {}", report.query),
            &json!({
                "query": report.query,
                "searchedResults": searched,
                "jobResults": jobs.len(),
                "queriesUsed": report.queries_used,
                "remainingQuota": report.remaining_quota,
                "results": &jobs,
            }),
        )
    }
}
