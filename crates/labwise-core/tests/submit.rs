use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use labwise_core::models::quota::{SubscriptionTier, UsageQuota};
use labwise_core::models::range::ReferenceRange;
use labwise_core::models::report::LabReport;
use labwise_core::models::test::{TestResult, TestValue};
use labwise_core::store::{QuotaStore, ReportStore, StoreError};
use labwise_core::submit::{SubmitError, submit_report};

#[derive(Default)]
struct MemoryReports {
    rows: Mutex<Vec<(LabReport, String)>>,
}

#[async_trait]
impl ReportStore for MemoryReports {
    async fn insert_report(&self, report: &LabReport, created_by: &str) -> Result<(), StoreError> {
        self.rows
            .lock()
            .unwrap()
            .push((report.clone(), created_by.to_string()));
        Ok(())
    }

    async fn list_reports(&self, created_by: &str) -> Result<Vec<LabReport>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, owner)| owner == created_by)
            .map(|(r, _)| r.clone())
            .collect())
    }

    async fn get_report(&self, id: Uuid, created_by: &str) -> Result<LabReport, StoreError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|(r, owner)| r.id == id && owner == created_by)
            .map(|(r, _)| r.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

struct MemoryQuota {
    used: AtomicU32,
    limit: u32,
    /// Number of `usage` reads that fail with a backend error before one
    /// succeeds.
    failing_reads: AtomicU32,
    reads: AtomicU32,
    consumed: AtomicU32,
}

impl MemoryQuota {
    fn with_usage(used: u32, limit: u32) -> Self {
        Self {
            used: AtomicU32::new(used),
            limit,
            failing_reads: AtomicU32::new(0),
            reads: AtomicU32::new(0),
            consumed: AtomicU32::new(0),
        }
    }

    fn failing_first(mut self, n: u32) -> Self {
        self.failing_reads = AtomicU32::new(n);
        self
    }
}

#[async_trait]
impl QuotaStore for MemoryQuota {
    async fn usage(&self, _user_id: &str) -> Result<UsageQuota, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Backend("connection reset".to_string()));
        }
        Ok(UsageQuota {
            reports_used: self.used.load(Ordering::SeqCst),
            reports_limit: self.limit,
            tier: SubscriptionTier::Free,
        })
    }

    async fn consume_report_credit(&self, _user_id: &str) -> Result<(), StoreError> {
        let used = self.used.load(Ordering::SeqCst);
        if used >= self.limit {
            return Err(StoreError::Conflict("report limit reached".to_string()));
        }
        self.used.store(used + 1, Ordering::SeqCst);
        self.consumed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn glucose(value: f64) -> TestResult {
    let mut test = TestResult::new();
    test.test_name = "Glucose".to_string();
    test.unit = "mg/dL".to_string();
    test.reference_range = ReferenceRange::numeric(Some(70.0), Some(99.0)).unwrap();
    test.value = Some(TestValue::Numeric(value));
    test
}

#[tokio::test]
async fn successful_submission_persists_and_consumes_one_credit() {
    let reports = MemoryReports::default();
    let quota = MemoryQuota::with_usage(3, 10);

    let report = submit_report(&quota, &reports, "Jane Doe", "P100", &[glucose(95.0)], "user-1")
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(reports.rows.lock().unwrap().len(), 1);
    assert_eq!(quota.consumed.load(Ordering::SeqCst), 1);
    assert_eq!(quota.used.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn exhausted_quota_rejects_before_any_write() {
    let reports = MemoryReports::default();
    let quota = MemoryQuota::with_usage(10, 10);

    let err = submit_report(&quota, &reports, "Jane Doe", "P100", &[glucose(95.0)], "user-1")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SubmitError::QuotaExceeded { used: 10, limit: 10 }
    ));
    assert!(reports.rows.lock().unwrap().is_empty());
    assert_eq!(quota.consumed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn validation_failure_leaves_the_store_untouched() {
    let reports = MemoryReports::default();
    let quota = MemoryQuota::with_usage(0, 10);

    let err = submit_report(&quota, &reports, "Jane Doe", "P100", &[], "user-1")
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Validation(_)));
    assert!(reports.rows.lock().unwrap().is_empty());
    assert_eq!(quota.consumed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transient_quota_read_is_retried_once() {
    let reports = MemoryReports::default();
    let quota = MemoryQuota::with_usage(0, 10).failing_first(1);

    submit_report(&quota, &reports, "Jane Doe", "P100", &[glucose(95.0)], "user-1")
        .await
        .unwrap();

    assert_eq!(quota.reads.load(Ordering::SeqCst), 2);
    assert_eq!(reports.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn persistent_quota_failure_aborts_without_writes() {
    let reports = MemoryReports::default();
    let quota = MemoryQuota::with_usage(0, 10).failing_first(2);

    let err = submit_report(&quota, &reports, "Jane Doe", "P100", &[glucose(95.0)], "user-1")
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::QuotaUnavailable(_)));
    assert_eq!(quota.reads.load(Ordering::SeqCst), 2);
    assert!(reports.rows.lock().unwrap().is_empty());
    assert_eq!(quota.consumed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn reports_are_owner_scoped() {
    let reports = MemoryReports::default();
    let quota = MemoryQuota::with_usage(0, 10);

    submit_report(&quota, &reports, "Jane Doe", "P100", &[glucose(95.0)], "user-1")
        .await
        .unwrap();

    assert_eq!(reports.list_reports("user-1").await.unwrap().len(), 1);
    assert!(reports.list_reports("user-2").await.unwrap().is_empty());
}
