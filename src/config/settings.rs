use serde::{Deserialize, Serialize};

use crate::quota::{QuotaTier, TierLimits};
use crate::search::providers::google::DEFAULT_API_BASE;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fixed quota tier; when unset the tier is derived from `user_email`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<QuotaTier>,

    /// Email of the signed-in caller, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,

    /// Email that is granted the owner tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,

    /// Daily unit ceilings per tier
    #[serde(default)]
    pub quota_limits: TierLimits,

    /// Google Custom Search credentials and paging
    #[serde(default)]
    pub google: GoogleSettings,

    /// Path of the JSON key-value store (default: next to the config file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,

    /// Enable file logging
    #[serde(default)]
    pub debug: bool,

    /// Log file or directory (default: `~/.config/rankcheck/rankcheck-debug.log`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_rotation: Option<DebugLogRotation>,

    /// Rotated log files to keep (default: 7 daily, 20 session)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_keep: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tier: None,
            user_email: None,
            owner_email: None,
            quota_limits: TierLimits::default(),
            google: GoogleSettings::default(),
            store_path: None,
            debug: false,
            debug_log_path: None,
            debug_log_rotation: None,
            debug_log_keep: None,
        }
    }
}

impl Config {
    /// Overlay credentials and identity from the environment.
    ///
    /// Recognized: `GOOGLE_API_KEY`, `GOOGLE_SEARCH_ID`, `OWNER_EMAIL`,
    /// `RANKCHECK_USER_EMAIL`, `RANKCHECK_TIER`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.google.api_key = key;
        }
        if let Some(cx) = lookup("GOOGLE_SEARCH_ID") {
            self.google.search_engine_id = cx;
        }
        if let Some(owner) = lookup("OWNER_EMAIL") {
            self.owner_email = Some(owner);
        }
        if let Some(email) = lookup("RANKCHECK_USER_EMAIL") {
            self.user_email = Some(email);
        }
        if let Some(tier) = lookup("RANKCHECK_TIER") {
            match tier.parse() {
                Ok(tier) => self.tier = Some(tier),
                Err(e) => tracing::warn!(error = %e, "ignoring RANKCHECK_TIER"),
            }
        }
    }

    /// Tier that applies to this caller
    pub fn effective_tier(&self) -> QuotaTier {
        self.tier.unwrap_or_else(|| {
            QuotaTier::classify(self.user_email.as_deref(), self.owner_email.as_deref())
        })
    }

    /// Daily unit limit for this caller
    pub fn daily_limit(&self) -> u64 {
        self.quota_limits.limit_for(self.effective_tier())
    }
}

/// Google Custom Search API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSettings {
    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Programmable Search Engine id (`cx`)
    #[serde(default)]
    pub search_engine_id: String,

    /// Optional custom API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Result pages fetched per ranking search (one unit each)
    #[serde(default = "default_pages")]
    pub pages: u32,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            search_engine_id: String::new(),
            api_base: None,
            pages: default_pages(),
        }
    }
}

impl GoogleSettings {
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

fn default_pages() -> u32 {
    2
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebugLogRotation {
    /// One file, appended forever
    None,
    /// One file per day
    Daily,
    /// One file per process start
    Session,
}
