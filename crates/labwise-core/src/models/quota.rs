use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-user, per-period report allowance, read before report creation and
/// consumed by exactly one credit after a successful creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UsageQuota {
    pub reports_used: u32,
    pub reports_limit: u32,
    pub tier: SubscriptionTier,
}

impl UsageQuota {
    pub fn exhausted(&self) -> bool {
        self.reports_used >= self.reports_limit
    }

    /// Free-tier defaults, used when no profile row exists yet.
    pub fn free_tier() -> Self {
        Self {
            reports_used: 0,
            reports_limit: 10,
            tier: SubscriptionTier::Free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
}
