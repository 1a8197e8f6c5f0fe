pub mod base;
pub mod context;
pub mod analyze_domains;
pub mod estimate_cost;
pub mod get_quota;
pub mod job_search;
pub mod search_history;
pub mod search_ranking;

use base::Tool;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ranking::RankingService;

/// Tool registry - manages all available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry with all tools wired to `service`
    pub fn new(service: Arc<RankingService>) -> Self {
        let mut registry = Self::empty();

        // Ranking searches (consume quota)
        registry.insert_tool(Arc::new(search_ranking::SearchRankingTool::new(service.clone())));
        registry.insert_tool(Arc::new(analyze_domains::AnalyzeDomainsTool::new(service.clone())));
        registry.insert_tool(Arc::new(job_search::JobSearchTool::new(service.clone())));

        // Read-only reporting
        registry.insert_tool(Arc::new(get_quota::GetQuotaTool::new(service.ledger())));
        registry.insert_tool(Arc::new(search_history::SearchHistoryTool::new(service.history())));
        registry.insert_tool(Arc::new(estimate_cost::EstimateCostTool));

        registry
    }

    /// Registry without any tools
    pub fn empty() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// All tools, sorted by id
    pub fn tools(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.values()
    }

    /// Get all tool names
    pub fn list_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Register a tool under its own id, replacing any previous one
    pub fn insert_tool(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.id().to_string(), tool);
    }
}
