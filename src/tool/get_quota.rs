use super::base::{Tool, ToolContext, ToolError, ToolResult};
use crate::quota::QuotaLedger;
use serde_json::json;
use std::sync::Arc;

/// Reports today's quota usage for the calling tier. Read-only apart from
/// the day rollover.
pub struct GetQuotaTool {
    ledger: Arc<QuotaLedger>,
}

impl GetQuotaTool {
    pub fn new(ledger: Arc<QuotaLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait::async_trait]
impl Tool for GetQuotaTool {
    fn id(&self) -> &str {
        "get_quota"
    }

    fn description(&self) -> &str {
        "Get current API quota usage information: units used today, the daily limit for \
         your tier, remaining units, usage percentage and time until the UTC midnight reset."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let snapshot = self.ledger.snapshot(ctx.daily_limit);

        ToolResult::json("API quota", &json!({
            "tier": ctx.tier,
            "quota": &snapshot,
        }))
    }
}
