//! Per-user usage counters on the `profiles` table.
//!
//! The credit consume is a single `consume_report_credit` RPC that
//! increments only while under the period limit, so two racing
//! submissions cannot under-count enforcement.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::info;

use labwise_core::models::quota::{SubscriptionTier, UsageQuota};
use labwise_core::store::{QuotaStore, StoreError};

use crate::client::{PostgrestClient, status_error, transport_error};

#[derive(Deserialize)]
struct ProfileRow {
    #[serde(default)]
    subscription_status: Option<String>,
    #[serde(default)]
    monthly_reports_used: Option<u32>,
    #[serde(default)]
    monthly_reports_limit: Option<u32>,
}

impl From<ProfileRow> for UsageQuota {
    fn from(row: ProfileRow) -> Self {
        let defaults = UsageQuota::free_tier();
        UsageQuota {
            reports_used: row.monthly_reports_used.unwrap_or(defaults.reports_used),
            reports_limit: row.monthly_reports_limit.unwrap_or(defaults.reports_limit),
            tier: match row.subscription_status.as_deref() {
                Some("pro") => SubscriptionTier::Pro,
                _ => SubscriptionTier::Free,
            },
        }
    }
}

#[async_trait]
impl QuotaStore for PostgrestClient {
    async fn usage(&self, user_id: &str) -> Result<UsageQuota, StoreError> {
        let response = self
            .table(Method::GET, "profiles")
            .query(&[
                ("id", format!("eq.{user_id}")),
                (
                    "select",
                    "subscription_status,monthly_reports_used,monthly_reports_limit".to_string(),
                ),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let mut rows: Vec<ProfileRow> = response.json().await.map_err(transport_error)?;
        // No profile row yet means a brand-new account on free-tier defaults.
        Ok(rows.pop().map(UsageQuota::from).unwrap_or_else(UsageQuota::free_tier))
    }

    async fn consume_report_credit(&self, user_id: &str) -> Result<(), StoreError> {
        let response = self
            .rpc("consume_report_credit")
            .json(&serde_json::json!({ "p_user_id": user_id }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        // The function returns true when a credit was consumed, false when
        // the limit was already reached.
        let consumed: bool = response.json().await.map_err(transport_error)?;
        if !consumed {
            return Err(StoreError::Conflict("report limit reached".to_string()));
        }

        info!(user_id, "report credit consumed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_row_maps_with_free_defaults_for_missing_columns() {
        let row: ProfileRow = serde_json::from_str("{}").unwrap();
        let quota: UsageQuota = row.into();
        assert_eq!(quota, UsageQuota::free_tier());

        let row: ProfileRow = serde_json::from_str(
            r#"{"subscription_status":"pro","monthly_reports_used":42,"monthly_reports_limit":100}"#,
        )
        .unwrap();
        let quota: UsageQuota = row.into();
        assert_eq!(quota.reports_used, 42);
        assert_eq!(quota.reports_limit, 100);
        assert_eq!(quota.tier, SubscriptionTier::Pro);
    }
}
