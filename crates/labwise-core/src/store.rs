//! Collaborator seams.
//!
//! The persistence store and quota counter are external collaborators;
//! these traits are the whole surface the core needs from them. The
//! production implementation lives in `labwise-store`; tests drive the
//! flows with in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::interpretation::LabInterpretation;
use crate::models::quota::UsageQuota;
use crate::models::report::LabReport;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Row store for reports and their test rows.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Insert the report row plus its test rows. All-or-nothing: a failure
    /// must leave no partial report behind.
    async fn insert_report(&self, report: &LabReport, created_by: &str) -> Result<(), StoreError>;

    /// Reports created by `created_by`, newest first.
    async fn list_reports(&self, created_by: &str) -> Result<Vec<LabReport>, StoreError>;

    /// Point lookup, owner-scoped.
    async fn get_report(&self, id: Uuid, created_by: &str) -> Result<LabReport, StoreError>;
}

/// Row store for per-report interpretations (at most one per report).
#[async_trait]
pub trait InterpretationStore: Send + Sync {
    /// Point lookup by report id. `Ok(None)` is the normal "generate new"
    /// branch; only a genuine query failure is an error.
    async fn find_interpretation(
        &self,
        report_id: Uuid,
    ) -> Result<Option<LabInterpretation>, StoreError>;

    /// Insert the interpretation keyed by report id. A duplicate insert
    /// returns `StoreError::Conflict`.
    async fn insert_interpretation(
        &self,
        report_id: Uuid,
        interpretation: &LabInterpretation,
        created_by: &str,
    ) -> Result<(), StoreError>;
}

/// Per-user usage counter.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn usage(&self, user_id: &str) -> Result<UsageQuota, StoreError>;

    /// Atomically consume one report credit, failing with
    /// `StoreError::Conflict` when the period limit is already reached.
    /// Single round trip at the persistence boundary, never read-then-write.
    async fn consume_report_credit(&self, user_id: &str) -> Result<(), StoreError>;
}
