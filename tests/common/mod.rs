//! Common test utilities and fixtures for quota and tool testing

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rankcheck::history::HistoryStore;
use rankcheck::quota::{FileStore, KeyValueStore, ManualClock, MemoryStore, QuotaLedger, QuotaTier};
use rankcheck::ranking::RankingService;
use rankcheck::search::{
    SearchError, SearchOptions, SearchProvider, SearchResult, SearchResults, RESULTS_PER_PAGE,
};
use rankcheck::tool::base::ToolContext;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Test fixture for file-backed stores
pub struct TestFixture {
    /// Temporary directory that gets cleaned up automatically
    pub temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Path of the JSON store file inside the fixture
    pub fn store_path(&self) -> PathBuf {
        self.path().join("store.json")
    }

    /// Open (or reopen) the file store
    pub fn file_store(&self) -> Arc<FileStore> {
        Arc::new(FileStore::new(self.store_path()))
    }
}

/// Fixed UTC instant
pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Search provider that serves canned results and counts calls
pub struct FakeProvider {
    pub results: Vec<SearchResult>,
    pub calls: AtomicUsize,
    pub fail_with: Option<fn() -> SearchError>,
}

impl FakeProvider {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            calls: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    pub fn failing(error: fn() -> SearchError) -> Self {
        Self {
            results: Vec::new(),
            calls: AtomicUsize::new(0),
            fail_with: Some(error),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SearchProvider for FakeProvider {
    async fn search(&self, _query: &str, options: &SearchOptions) -> Result<SearchResults, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_with {
            return Err(error());
        }

        let cap = (options.effective_pages() * RESULTS_PER_PAGE) as usize;
        let items: Vec<SearchResult> = self
            .results
            .iter()
            .filter(|r| options.matches_domain_filters(&r.url))
            .take(cap)
            .cloned()
            .enumerate()
            .map(|(idx, mut r)| {
                r.rank = idx + 1;
                r
            })
            .collect();

        Ok(SearchResults {
            total_results: Some(self.results.len() as u64),
            units_consumed: u64::from(options.effective_pages()),
            items,
        })
    }
}

/// Result with the given URL and display link
pub fn result(url: &str, display_link: &str, title: &str) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        url: url.to_string(),
        snippet: format!("{} snippet", title),
        display_link: display_link.to_string(),
        ..Default::default()
    }
}

/// Ledger, history and service over one in-memory store and a manual clock
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub ledger: Arc<QuotaLedger>,
    pub history: Arc<HistoryStore>,
    pub provider: Arc<FakeProvider>,
    pub service: Arc<RankingService>,
}

impl Harness {
    pub fn new(provider: FakeProvider) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(utc(2024, 5, 1, 9, 0)));
        let shared: Arc<dyn KeyValueStore> = store.clone();

        let ledger = Arc::new(QuotaLedger::with_clock(shared.clone(), clock.clone()));
        let history = Arc::new(HistoryStore::new(shared));
        let provider = Arc::new(provider);
        let service = Arc::new(RankingService::new(
            provider.clone(),
            ledger.clone(),
            history.clone(),
            2,
        ));

        Self {
            store,
            clock,
            ledger,
            history,
            provider,
            service,
        }
    }

    pub fn context(&self, daily_limit: u64) -> ToolContext {
        ToolContext::new("test_session", "test_request", QuotaTier::User, daily_limit)
    }
}
