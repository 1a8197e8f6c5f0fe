use anyhow::{bail, Context, Result};
use std::sync::Arc;

use crate::config::{self, Config};
use crate::history::HistoryStore;
use crate::quota::{FileStore, KeyValueStore, QuotaLedger};
use crate::ranking::RankingService;
use crate::search::providers::GoogleSearchProvider;
use crate::server::ToolServer;
use crate::tool::base::ToolContext;
use crate::tool::ToolRegistry;

const USAGE: &str = "Usage: rankcheck [serve | quota | reset]\n\
\n\
  serve   Run the MCP tool server on stdio (default)\n\
  quota   Print today's quota usage as JSON\n\
  reset   Clear today's quota usage";

/// Everything the commands need, built once per process
pub struct App {
    pub config: Config,
    pub ledger: Arc<QuotaLedger>,
    pub service: Arc<RankingService>,
}

impl App {
    pub fn build(config: Config) -> Result<Self> {
        let store_path = config::store_path(&config)?;
        let file_store = FileStore::new(store_path);
        tracing::debug!(path = %file_store.path().display(), "using key-value store");
        let store: Arc<dyn KeyValueStore> = Arc::new(file_store);

        let ledger = Arc::new(QuotaLedger::new(store.clone()));
        let history = Arc::new(HistoryStore::new(store));

        if config.google.api_key.is_empty() || config.google.search_engine_id.is_empty() {
            tracing::warn!("GOOGLE_API_KEY or GOOGLE_SEARCH_ID not set, searches will fail");
        }
        let provider = GoogleSearchProvider::new(
            config.google.api_key.clone(),
            config.google.search_engine_id.clone(),
        )
        .context("Failed to create search client")?
        .with_api_base(config.google.api_base());

        let service = Arc::new(RankingService::new(
            Arc::new(provider),
            ledger.clone(),
            history,
            config.google.pages,
        ));

        Ok(Self {
            config,
            ledger,
            service,
        })
    }

    fn context(&self) -> ToolContext {
        ToolContext::from_config("stdio", &self.config)
    }
}

/// Binary entry point
pub async fn run() -> Result<()> {
    let command = std::env::args().nth(1).unwrap_or_else(|| "serve".to_string());
    if matches!(command.as_str(), "-h" | "--help" | "help") {
        eprintln!("{}", USAGE);
        return Ok(());
    }

    let config = config::load_or_create_config()?;
    let _log_guard = crate::logging::init(&config)?;
    let app = App::build(config)?;

    match command.as_str() {
        "serve" => {
            let registry = ToolRegistry::new(app.service.clone());
            ToolServer::new(registry, app.context()).run_stdio().await
        }
        "quota" => {
            let ctx = app.context();
            let snapshot = app.ledger.snapshot(ctx.daily_limit);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        "reset" => {
            let record = app.ledger.reset();
            eprintln!("Quota reset for {}", record.date);
            Ok(())
        }
        other => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}
