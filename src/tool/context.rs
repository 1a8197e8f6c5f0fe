use super::base::ToolContext;
use crate::config::Config;
use crate::quota::QuotaTier;

impl ToolContext {
    /// Create a new tool context
    pub fn new(
        session_id: impl Into<String>,
        request_id: impl Into<String>,
        tier: QuotaTier,
        daily_limit: u64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            request_id: request_id.into(),
            tier,
            daily_limit,
        }
    }

    /// Context for the caller described by `config`
    pub fn from_config(session_id: impl Into<String>, config: &Config) -> Self {
        Self::new(
            session_id,
            "default",
            config.effective_tier(),
            config.daily_limit(),
        )
    }

    /// Same caller, new request id
    pub fn for_request(&self, request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..self.clone()
        }
    }
}
