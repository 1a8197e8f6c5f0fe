//! Daily Google API quota accounting.
//!
//! [`QuotaLedger`] tracks units consumed per UTC day in a [`KeyValueStore`].
//! Which limit applies is decided by the caller's [`QuotaTier`].

pub mod clock;
pub mod ledger;
pub mod store;
pub mod tier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::{QuotaEntry, QuotaLedger, QuotaRecord, QuotaSnapshot, QUOTA_STORE_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use tier::{QuotaTier, TierLimits};

/// Quota-related errors
#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("Daily quota exhausted: {needed} units needed, {remaining} remaining. Resets in {resets_in}")]
    Exhausted {
        needed: u64,
        remaining: u64,
        resets_in: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
