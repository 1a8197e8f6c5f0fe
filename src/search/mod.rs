pub mod analysis;
pub mod job_filter;
pub mod providers;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Results returned by the upstream API per page (one quota unit each)
pub const RESULTS_PER_PAGE: u32 = 10;

/// The API refuses `start` beyond 91, i.e. more than 10 pages
pub const MAX_PAGES: u32 = 10;

/// Search provider abstraction - different providers can be plugged in
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a search query with given options
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResults, SearchError>;
}

/// Search options for filtering and controlling results
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of result pages to fetch (default: 2, i.e. the top 20)
    pub pages: u32,
    /// Only include results from these domains (empty = no filter)
    pub allowed_domains: Vec<String>,
    /// Exclude results from these domains
    pub blocked_domains: Vec<String>,
}

impl SearchOptions {
    /// Pages actually requested, bounded to what the API serves
    pub fn effective_pages(&self) -> u32 {
        self.pages.clamp(1, MAX_PAGES)
    }

    /// Check if URL matches domain filtering rules
    pub fn matches_domain_filters(&self, url: &str) -> bool {
        // White list filtering (if specified, only these domains are allowed)
        if !self.allowed_domains.is_empty()
            && !self.allowed_domains.iter().any(|domain| url.contains(domain.as_str()))
        {
            return false;
        }

        // Blacklist filtering (exclude these domains)
        !self
            .blocked_domains
            .iter()
            .any(|domain| url.contains(domain.as_str()))
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            pages: 2,
            allowed_domains: Vec::new(),
            blocked_domains: Vec::new(),
        }
    }
}

/// Search results container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Ranked result items, best first
    pub items: Vec<SearchResult>,
    /// Total number of results available (if provided by the search engine)
    pub total_results: Option<u64>,
    /// Billable API units spent producing these results
    pub units_consumed: u64,
}

/// Individual search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// 1-based position after filtering
    pub rank: usize,
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Snippet/description of the page content
    pub snippet: String,
    /// Host as displayed by the search engine (e.g. `www.example.com`)
    pub display_link: String,
    /// Open Graph / meta description tags, when the engine reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Subset of a page's meta tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Search-related errors
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),

    /// A later page failed after earlier pages were already billed
    #[error("{source} (after {units_consumed} billed page(s))")]
    Interrupted {
        units_consumed: u64,
        #[source]
        source: Box<SearchError>,
    },
}

impl SearchError {
    /// Quota units spent before the failure
    pub fn units_consumed(&self) -> u64 {
        match self {
            SearchError::Interrupted { units_consumed, .. } => *units_consumed,
            _ => 0,
        }
    }
}
