use chrono::{DateTime, Days, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::store::KeyValueStore;
use super::QuotaError;

/// Store key holding the serialized [`QuotaRecord`]
pub const QUOTA_STORE_KEY: &str = "google_api_quota";

/// Upper bound for the formatted reset countdown, in seconds (23h59m59s).
const MAX_COUNTDOWN_SECS: i64 = 24 * 60 * 60 - 1;

/// Usage for one UTC calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaRecord {
    /// UTC day this record belongs to (`YYYY-MM-DD`)
    pub date: String,
    /// Units consumed since `date` began
    #[serde(default)]
    pub queries_used: u64,
    /// Milliseconds since epoch of the last mutation
    #[serde(default)]
    pub last_updated: i64,
    /// Append-only consumption log, oldest first
    #[serde(default, alias = "searches")]
    pub entries: Vec<QuotaEntry>,
}

/// One consumption event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaEntry {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, alias = "query")]
    pub label: String,
    #[serde(alias = "queriesConsumed")]
    pub units_consumed: u64,
}

impl QuotaRecord {
    /// Empty record for the day containing `now`
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            date: day_string(now),
            queries_used: 0,
            last_updated: now.timestamp_millis(),
            entries: Vec::new(),
        }
    }

    /// Make `queries_used` equal the sum of the logged entries. Records with
    /// no entries keep their stored total. Returns whether anything changed.
    pub fn reconcile_usage(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let total: u64 = self.entries.iter().map(|e| e.units_consumed).sum();
        if total == self.queries_used {
            return false;
        }
        self.queries_used = total;
        true
    }

    pub fn remaining(&self, limit: u64) -> u64 {
        limit.saturating_sub(self.queries_used)
    }

    /// Share of `limit` already used, clamped to `[0, 100]`.
    ///
    /// A zero limit reads as fully exhausted.
    pub fn usage_percentage(&self, limit: u64) -> f64 {
        if limit == 0 {
            return 100.0;
        }
        (self.queries_used as f64 / limit as f64 * 100.0).min(100.0)
    }

    pub fn can_consume(&self, limit: u64, units: u64) -> bool {
        self.remaining(limit) >= units
    }
}

/// Serializable view of the ledger against a given limit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaSnapshot {
    pub date: String,
    pub queries_used: u64,
    pub limit: u64,
    pub remaining: u64,
    pub usage_percentage: f64,
    pub resets_in: String,
    pub total_searches: usize,
    pub entries: Vec<QuotaEntry>,
}

/// Daily quota ledger backed by a key-value store.
///
/// Records roll over at UTC midnight: any read on a later UTC day replaces the
/// stored record with an empty one before anything else happens. Store
/// failures are logged and never surface to callers; accounting degrades to
/// in-memory values instead of blocking searches.
///
/// The ledger does not know about limits. Callers pass the limit that applies
/// to them on every call.
pub struct QuotaLedger {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
}

impl QuotaLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            key: QUOTA_STORE_KEY.to_string(),
        }
    }

    /// Current record, rolling over to a fresh one if the stored record is
    /// missing, malformed, unreadable, or from an earlier UTC day.
    pub fn record(&self) -> QuotaRecord {
        let today = day_string(self.clock.now());

        match self.load() {
            Some(record) if record.date == today => record,
            Some(record) => {
                tracing::info!(
                    stale_date = %record.date,
                    today = %today,
                    queries_used = record.queries_used,
                    "quota day rolled over, resetting usage"
                );
                self.reset()
            }
            None => self.reset(),
        }
    }

    /// Replace the stored record with an empty one for today.
    pub fn reset(&self) -> QuotaRecord {
        let record = QuotaRecord::fresh(self.clock.now());
        self.persist(&record);
        tracing::debug!(date = %record.date, "quota record reset");
        record
    }

    /// Append a consumption event and add its units to today's usage.
    ///
    /// The limit is not checked here; use [`can_consume`](Self::can_consume)
    /// or [`ensure_available`](Self::ensure_available) first to block.
    pub fn record_consumption(&self, label: &str, units: u64) -> Result<QuotaRecord, QuotaError> {
        if units == 0 {
            return Err(QuotaError::InvalidArgument(
                "units consumed must be at least 1".to_string(),
            ));
        }

        let mut record = self.record();
        let now = self.clock.now().timestamp_millis();

        record.entries.push(QuotaEntry {
            timestamp: now,
            label: label.to_string(),
            units_consumed: units,
        });
        record.queries_used = record.queries_used.saturating_add(units);
        record.last_updated = now;

        self.persist(&record);

        tracing::info!(
            label = %label,
            units,
            queries_used = record.queries_used,
            "recorded quota consumption"
        );

        Ok(record)
    }

    pub fn remaining(&self, limit: u64) -> u64 {
        self.record().remaining(limit)
    }

    pub fn usage_percentage(&self, limit: u64) -> f64 {
        self.record().usage_percentage(limit)
    }

    pub fn can_consume(&self, limit: u64, units: u64) -> bool {
        self.record().can_consume(limit, units)
    }

    /// Fail with a user-facing message when `units` would exceed `limit`.
    pub fn ensure_available(&self, limit: u64, units: u64) -> Result<(), QuotaError> {
        let remaining = self.remaining(limit);
        if remaining >= units {
            return Ok(());
        }

        tracing::warn!(needed = units, remaining, limit, "daily quota exhausted");

        Err(QuotaError::Exhausted {
            needed: units,
            remaining,
            resets_in: self.time_until_reset_formatted(),
        })
    }

    /// Time left until the next UTC midnight strictly after now.
    ///
    /// Exactly at midnight this is a full 24 hours.
    pub fn time_until_reset(&self) -> chrono::Duration {
        let now = self.clock.now();
        next_midnight_after(now) - now
    }

    /// Countdown rendered as `{hours}時間{minutes}分`.
    ///
    /// Minutes are truncated and the value never reaches 24 hours.
    pub fn time_until_reset_formatted(&self) -> String {
        format_countdown(self.time_until_reset())
    }

    pub fn snapshot(&self, limit: u64) -> QuotaSnapshot {
        let record = self.record();
        QuotaSnapshot {
            remaining: record.remaining(limit),
            usage_percentage: record.usage_percentage(limit),
            resets_in: self.time_until_reset_formatted(),
            total_searches: record.entries.len(),
            date: record.date,
            queries_used: record.queries_used,
            limit,
            entries: record.entries,
        }
    }

    fn load(&self) -> Option<QuotaRecord> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read quota record, assuming no usage");
                return None;
            }
        };

        match serde_json::from_str::<QuotaRecord>(&raw) {
            Ok(mut record) => {
                let stored = record.queries_used;
                if record.reconcile_usage() {
                    tracing::warn!(
                        stored,
                        from_entries = record.queries_used,
                        "quota total disagreed with its entries, using the entry sum"
                    );
                }
                Some(record)
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed quota record, assuming no usage");
                None
            }
        }
    }

    fn persist(&self, record: &QuotaRecord) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize quota record");
                return;
            }
        };

        if let Err(e) = self.store.set(&self.key, &json) {
            tracing::warn!(error = %e, "failed to persist quota record, usage kept in memory only");
        }
    }
}

fn day_string(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

fn next_midnight_after(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + Days::new(1);
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}

fn format_countdown(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds().clamp(0, MAX_COUNTDOWN_SECS);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{}時間{}分", hours, minutes)
}
