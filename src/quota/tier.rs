use serde::{Deserialize, Serialize};

/// Caller classification that decides which daily limit applies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuotaTier {
    /// Not signed in
    #[default]
    Guest,
    /// Signed-in user
    User,
    /// The deployment owner
    Owner,
}

impl QuotaTier {
    /// Classify a caller by the email they are signed in with.
    ///
    /// The owner email comparison is case-insensitive. An empty owner email
    /// never matches.
    pub fn classify(email: Option<&str>, owner_email: Option<&str>) -> Self {
        let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
            return QuotaTier::Guest;
        };

        match owner_email.map(str::trim).filter(|o| !o.is_empty()) {
            Some(owner) if owner.eq_ignore_ascii_case(email) => QuotaTier::Owner,
            _ => QuotaTier::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaTier::Guest => "guest",
            QuotaTier::User => "user",
            QuotaTier::Owner => "owner",
        }
    }
}

impl std::str::FromStr for QuotaTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(QuotaTier::Guest),
            "user" => Ok(QuotaTier::User),
            "owner" => Ok(QuotaTier::Owner),
            other => Err(format!("Invalid quota tier: {}", other)),
        }
    }
}

impl std::fmt::Display for QuotaTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily unit ceilings per tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierLimits {
    #[serde(default = "default_guest_limit")]
    pub guest: u64,
    #[serde(default = "default_user_limit")]
    pub user: u64,
    #[serde(default = "default_owner_limit")]
    pub owner: u64,
}

impl TierLimits {
    pub fn limit_for(&self, tier: QuotaTier) -> u64 {
        match tier {
            QuotaTier::Guest => self.guest,
            QuotaTier::User => self.user,
            QuotaTier::Owner => self.owner,
        }
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            guest: default_guest_limit(),
            user: default_user_limit(),
            owner: default_owner_limit(),
        }
    }
}

fn default_guest_limit() -> u64 {
    10
}

fn default_user_limit() -> u64 {
    50
}

fn default_owner_limit() -> u64 {
    500
}
