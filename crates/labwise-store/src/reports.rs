//! Report and test-row persistence.
//!
//! The insert goes through a single `create_lab_report` RPC so the report
//! row and its test rows land in one transaction; a failed submission
//! leaves no partial report behind.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use labwise_core::models::range::ReferenceRange;
use labwise_core::models::report::LabReport;
use labwise_core::models::test::{TestResult, TestResultKind, TestStatus, TestValue};
use labwise_core::store::{ReportStore, StoreError};

use crate::client::{PostgrestClient, status_error, transport_error};

#[derive(Serialize)]
struct CreateReportParams<'a> {
    p_id: Uuid,
    p_patient_name: &'a str,
    p_patient_id: &'a str,
    p_created_at: &'a jiff::Timestamp,
    p_created_by: &'a str,
    p_tests: Vec<TestRow>,
}

/// One `test_results` row. `value` and `reference_range` are jsonb so all
/// three range shapes and both value kinds round-trip.
#[derive(Serialize, Deserialize)]
struct TestRow {
    id: Uuid,
    test_name: String,
    value: Option<TestValue>,
    unit: String,
    kind: TestResultKind,
    reference_range: ReferenceRange,
    status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

#[derive(Deserialize)]
struct ReportRow {
    id: Uuid,
    patient_name: String,
    patient_id: String,
    created_at: jiff::Timestamp,
    #[serde(default)]
    test_results: Vec<TestRow>,
}

impl From<&TestResult> for TestRow {
    fn from(test: &TestResult) -> Self {
        Self {
            id: test.id,
            test_name: test.test_name.clone(),
            value: test.value.clone(),
            unit: test.unit.clone(),
            kind: test.kind,
            reference_range: test.reference_range.clone(),
            status: test.status,
            category: test.category.clone(),
        }
    }
}

impl From<ReportRow> for LabReport {
    fn from(row: ReportRow) -> Self {
        LabReport {
            id: row.id,
            patient_name: row.patient_name,
            patient_id: row.patient_id,
            date: row.created_at,
            results: row
                .test_results
                .into_iter()
                .map(|t| TestResult {
                    id: t.id,
                    test_name: t.test_name,
                    value: t.value,
                    unit: t.unit,
                    kind: t.kind,
                    reference_range: t.reference_range,
                    status: t.status,
                    category: t.category,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ReportStore for PostgrestClient {
    async fn insert_report(&self, report: &LabReport, created_by: &str) -> Result<(), StoreError> {
        let params = CreateReportParams {
            p_id: report.id,
            p_patient_name: &report.patient_name,
            p_patient_id: &report.patient_id,
            p_created_at: &report.date,
            p_created_by: created_by,
            p_tests: report.results.iter().map(TestRow::from).collect(),
        };

        let response = self
            .rpc("create_lab_report")
            .json(&params)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        info!(report_id = %report.id, tests = report.results.len(), "report row inserted");
        Ok(())
    }

    async fn list_reports(&self, created_by: &str) -> Result<Vec<LabReport>, StoreError> {
        let response = self
            .table(Method::GET, "lab_results")
            .query(&[
                ("created_by", format!("eq.{created_by}")),
                ("select", "*,test_results(*)".to_string()),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let rows: Vec<ReportRow> = response.json().await.map_err(transport_error)?;
        Ok(rows.into_iter().map(LabReport::from).collect())
    }

    async fn get_report(&self, id: Uuid, created_by: &str) -> Result<LabReport, StoreError> {
        let response = self
            .table(Method::GET, "lab_results")
            .query(&[
                ("id", format!("eq.{id}")),
                ("created_by", format!("eq.{created_by}")),
                ("select", "*,test_results(*)".to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let mut rows: Vec<ReportRow> = response.json().await.map_err(transport_error)?;
        match rows.pop() {
            Some(row) => Ok(row.into()),
            None => Err(StoreError::NotFound(format!("lab result {id}"))),
        }
    }
}
