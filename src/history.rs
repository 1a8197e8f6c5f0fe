use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::quota::KeyValueStore;
use crate::search::SearchResult;

/// Store key holding the serialized [`SearchStats`]
pub const HISTORY_STORE_KEY: &str = "seo_search_history";

/// Most recent searches kept
pub const MAX_HISTORY_ITEMS: usize = 50;

/// One completed search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistory {
    pub id: String,
    pub query: String,
    /// Milliseconds since epoch
    pub timestamp: i64,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub queries_used: u64,
}

impl SearchHistory {
    pub fn new(query: impl Into<String>, results: Vec<SearchResult>, queries_used: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            query: query.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            results,
            queries_used,
        }
    }
}

/// Lifetime totals plus the bounded history, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    #[serde(default)]
    pub total_searches: u64,
    #[serde(default)]
    pub total_queries: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_search: Option<String>,
    #[serde(default)]
    pub search_history: Vec<SearchHistory>,
}

/// Search history persisted in a [`KeyValueStore`].
///
/// Like the quota ledger, failures are logged and reads fall back to empty
/// stats.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn stats(&self) -> SearchStats {
        let raw = match self.store.get(HISTORY_STORE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SearchStats::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read search history");
                return SearchStats::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "malformed search history, starting empty");
            SearchStats::default()
        })
    }

    /// Prepend a search, dropping the oldest beyond [`MAX_HISTORY_ITEMS`].
    pub fn record(&self, entry: SearchHistory) -> SearchStats {
        let mut stats = self.stats();

        stats.total_searches += 1;
        stats.total_queries += entry.queries_used;
        stats.last_search = Some(entry.query.clone());
        stats.search_history.insert(0, entry);
        stats.search_history.truncate(MAX_HISTORY_ITEMS);

        match serde_json::to_string(&stats) {
            Ok(json) => {
                if let Err(e) = self.store.set(HISTORY_STORE_KEY, &json) {
                    tracing::warn!(error = %e, "failed to save search history");
                }
            }
            Err(e) => tracing::error!(error = %e, "failed to serialize search history"),
        }

        stats
    }

    pub fn entries(&self) -> Vec<SearchHistory> {
        self.stats().search_history
    }

    pub fn find(&self, id: &str) -> Option<SearchHistory> {
        self.entries().into_iter().find(|entry| entry.id == id)
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(HISTORY_STORE_KEY) {
            tracing::warn!(error = %e, "failed to clear search history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::MemoryStore;

    fn history() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_record_prepends_and_counts() {
        let history = history();
        history.record(SearchHistory::new("first", Vec::new(), 2));
        let stats = history.record(SearchHistory::new("second", Vec::new(), 1));

        assert_eq!(stats.total_searches, 2);
        assert_eq!(stats.total_queries, 3);
        assert_eq!(stats.last_search.as_deref(), Some("second"));
        assert_eq!(stats.search_history[0].query, "second");
        assert_eq!(history.stats(), stats);
    }

    #[test]
    fn test_history_is_capped() {
        let history = history();
        for i in 0..(MAX_HISTORY_ITEMS + 5) {
            history.record(SearchHistory::new(format!("q{}", i), Vec::new(), 1));
        }

        let stats = history.stats();
        assert_eq!(stats.search_history.len(), MAX_HISTORY_ITEMS);
        assert_eq!(stats.total_searches, (MAX_HISTORY_ITEMS + 5) as u64);
        assert_eq!(stats.search_history[0].query, format!("q{}", MAX_HISTORY_ITEMS + 4));
    }

    #[test]
    fn test_find_and_clear() {
        let history = history();
        let entry = SearchHistory::new("rust", Vec::new(), 2);
        let id = entry.id.clone();
        history.record(entry);

        assert_eq!(history.find(&id).map(|e| e.query), Some("rust".to_string()));
        assert!(history.find("missing").is_none());

        history.clear();
        assert!(history.entries().is_empty());
        assert_eq!(history.stats().total_searches, 0);
    }

    #[test]
    fn test_malformed_history_reads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_STORE_KEY, "{broken").unwrap();

        let history = HistoryStore::new(store);
        assert_eq!(history.stats(), SearchStats::default());
    }
}
