use crate::logging::redact_secrets;
use crate::search::{
    PageMeta, SearchError, SearchOptions, SearchProvider, SearchResult, SearchResults,
    RESULTS_PER_PAGE,
};
use serde_json::Value;
use std::time::Duration;

/// Default endpoint root for the Custom Search JSON API
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

/// Google Custom Search JSON API provider
///
/// Every page request costs one quota unit. Free tier: 100 requests/day.
/// Documentation: https://developers.google.com/custom-search/v1/overview
pub struct GoogleSearchProvider {
    client: reqwest::Client,
    api_key: String,
    search_engine_id: String,
    api_base: String,
}

impl GoogleSearchProvider {
    /// Create a provider for the given API key and search engine id (`cx`)
    pub fn new(
        api_key: impl Into<String>,
        search_engine_id: impl Into<String>,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            search_engine_id: search_engine_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Point the provider at a different endpoint root (mirrors, tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_page(&self, query: &str, start: u32) -> Result<Value, SearchError> {
        let url = format!("{}/customsearch/v1", self.api_base);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", query),
                ("start", &start.to_string()),
            ])
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| error_text.clone());

        tracing::warn!(
            status = %status,
            error = %redact_secrets(&message),
            start,
            "google search api error"
        );

        Err(classify_error(status.as_u16(), &message))
    }

    fn parse_item(item: &Value) -> SearchResult {
        let text = |v: &Value| v.as_str().unwrap_or("").to_string();

        let meta = item["pagemap"]["metatags"]
            .as_array()
            .and_then(|tags| tags.first())
            .map(|tags| PageMeta {
                og_type: tags["og:type"].as_str().map(str::to_string),
                og_title: tags["og:title"].as_str().map(str::to_string),
                og_description: tags["og:description"].as_str().map(str::to_string),
                description: tags["description"].as_str().map(str::to_string),
            });

        SearchResult {
            rank: 0,
            title: text(&item["title"]),
            url: text(&item["link"]),
            snippet: text(&item["snippet"]),
            display_link: text(&item["displayLink"]),
            meta,
        }
    }
}

fn classify_error(status: u16, message: &str) -> SearchError {
    let lower = message.to_lowercase();
    match status {
        400 if lower.contains("api key") => SearchError::InvalidApiKey,
        401 => SearchError::InvalidApiKey,
        403 if lower.contains("quota") || lower.contains("limit") => SearchError::RateLimitExceeded,
        403 => SearchError::InvalidApiKey,
        429 => SearchError::RateLimitExceeded,
        _ => SearchError::ApiError(format!("HTTP {}: {}", status, redact_secrets(message))),
    }
}

#[async_trait::async_trait]
impl SearchProvider for GoogleSearchProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, SearchError> {
        if self.api_key.trim().is_empty() || self.search_engine_id.trim().is_empty() {
            return Err(SearchError::InvalidApiKey);
        }

        let pages = options.effective_pages();

        tracing::debug!(query = %query, pages, "performing google search");

        let mut items = Vec::new();
        let mut total_results = None;
        let mut units_consumed = 0u64;

        for page in 0..pages {
            let start = 1 + page * RESULTS_PER_PAGE;
            let json = match self.fetch_page(query, start).await {
                Ok(json) => json,
                Err(e) if units_consumed > 0 => {
                    return Err(SearchError::Interrupted {
                        units_consumed,
                        source: Box::new(e),
                    })
                }
                Err(e) => return Err(e),
            };
            units_consumed += 1;

            if total_results.is_none() {
                total_results = json["searchInformation"]["totalResults"]
                    .as_str()
                    .and_then(|s| s.parse().ok());
            }

            let page_items = json["items"].as_array().map(Vec::as_slice).unwrap_or(&[]);
            for item in page_items {
                let result = Self::parse_item(item);

                // Apply domain filtering
                if !options.matches_domain_filters(&result.url) {
                    tracing::trace!(url = %result.url, "filtered out by domain rules");
                    continue;
                }
                items.push(result);
            }

            // A short page means there is nothing further to fetch.
            if page_items.len() < RESULTS_PER_PAGE as usize {
                break;
            }
        }

        for (idx, item) in items.iter_mut().enumerate() {
            item.rank = idx + 1;
        }

        tracing::debug!(
            query = %query,
            result_count = items.len(),
            units_consumed,
            "google search completed"
        );

        Ok(SearchResults {
            items,
            total_results,
            units_consumed,
        })
    }
}
