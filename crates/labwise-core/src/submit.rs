//! The report submission sequence.
//!
//! Strict order: quota read → exhausted check → validation → report
//! persistence → credit consumption. A rejection at any step before the
//! insert leaves the store completely untouched.

use tracing::{info, warn};

use crate::assemble::{AssembleError, assemble_with};
use crate::classify::ClassifyOptions;
use crate::models::report::LabReport;
use crate::models::test::TestResult;
use crate::store::{QuotaStore, ReportStore, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] AssembleError),

    #[error("monthly report limit reached ({used} of {limit}); please upgrade your plan")]
    QuotaExceeded { used: u32, limit: u32 },

    #[error("unable to verify usage limits: {0}")]
    QuotaUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Submit a report for `user_id`.
///
/// The quota read is retried once on a backend failure (transient reads
/// are common against the hosted store); everything after it runs exactly
/// once. The credit consumption is a single atomic increment-with-limit
/// check at the store, so concurrent submissions cannot under-count.
pub async fn submit_report<Q, R>(
    quota: &Q,
    reports: &R,
    patient_name: &str,
    patient_id: &str,
    entries: &[TestResult],
    user_id: &str,
) -> Result<LabReport, SubmitError>
where
    Q: QuotaStore + ?Sized,
    R: ReportStore + ?Sized,
{
    let usage = match quota.usage(user_id).await {
        Ok(usage) => usage,
        Err(StoreError::Backend(first)) => {
            warn!(user_id, error = %first, "quota read failed, retrying once");
            quota
                .usage(user_id)
                .await
                .map_err(|e| SubmitError::QuotaUnavailable(e.to_string()))?
        }
        Err(e) => return Err(SubmitError::QuotaUnavailable(e.to_string())),
    };

    if usage.exhausted() {
        return Err(SubmitError::QuotaExceeded {
            used: usage.reports_used,
            limit: usage.reports_limit,
        });
    }

    let report = assemble_with(
        patient_name,
        patient_id,
        entries,
        &ClassifyOptions::default(),
    )?;

    reports.insert_report(&report, user_id).await?;
    quota.consume_report_credit(user_id).await?;

    info!(
        report_id = %report.id,
        user_id,
        tests = report.results.len(),
        "report submitted"
    );

    Ok(report)
}
