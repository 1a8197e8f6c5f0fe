use serde::Serialize;
use std::sync::Arc;

use crate::history::{HistoryStore, SearchHistory};
use crate::quota::{QuotaError, QuotaLedger};
use crate::search::{SearchError, SearchOptions, SearchProvider, SearchResult};

/// Ranked results of one keyword, with the quota it cost
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    pub query: String,
    pub total_results: usize,
    /// Units spent on this search
    pub queries_used: u64,
    pub remaining_quota: u64,
    pub results: Vec<SearchResult>,
}

/// Ranking-related errors
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("query cannot be empty")]
    EmptyQuery,

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
}

/// Runs quota-checked ranking searches and records what they cost.
///
/// The daily limit is supplied per call; the service holds no caller
/// identity.
pub struct RankingService {
    provider: Arc<dyn SearchProvider>,
    ledger: Arc<QuotaLedger>,
    history: Arc<HistoryStore>,
    pages: u32,
}

impl RankingService {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        ledger: Arc<QuotaLedger>,
        history: Arc<HistoryStore>,
        pages: u32,
    ) -> Self {
        Self {
            provider,
            ledger,
            history,
            pages,
        }
    }

    pub fn ledger(&self) -> Arc<QuotaLedger> {
        self.ledger.clone()
    }

    pub fn history(&self) -> Arc<HistoryStore> {
        self.history.clone()
    }

    /// Search options with this service's page count
    pub fn options(&self, allowed_domains: Vec<String>, blocked_domains: Vec<String>) -> SearchOptions {
        SearchOptions {
            pages: self.pages,
            allowed_domains,
            blocked_domains,
        }
    }

    /// Check quota, search, then record consumption and history.
    ///
    /// Blocks before any API call when the remaining quota cannot cover every
    /// page of the search.
    pub async fn rank(
        &self,
        query: &str,
        options: &SearchOptions,
        limit: u64,
    ) -> Result<RankingReport, RankingError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RankingError::EmptyQuery);
        }

        let needed = u64::from(options.effective_pages());
        self.ledger.ensure_available(limit, needed)?;

        let results = match self.provider.search(query, options).await {
            Ok(results) => results,
            Err(e) => {
                let spent = e.units_consumed();
                if spent > 0 {
                    self.ledger.record_consumption(query, spent)?;
                    tracing::warn!(query = %query, units = spent, error = %e, "search failed after billed pages");
                }
                return Err(e.into());
            }
        };

        if results.units_consumed > 0 {
            self.ledger.record_consumption(query, results.units_consumed)?;
        }
        self.history.record(SearchHistory::new(
            query,
            results.items.clone(),
            results.units_consumed,
        ));

        let report = RankingReport {
            query: query.to_string(),
            total_results: results.items.len(),
            queries_used: results.units_consumed,
            remaining_quota: self.ledger.remaining(limit),
            results: results.items,
        };

        tracing::info!(
            query = %report.query,
            results = report.total_results,
            units = report.queries_used,
            remaining = report.remaining_quota,
            "ranking search completed"
        );

        Ok(report)
    }
}
