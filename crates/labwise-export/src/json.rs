use labwise_core::models::report::LabReport;

use crate::error::ExportError;

/// Pretty-printed JSON serialization of the report.
pub fn export_json(report: &LabReport) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(report)?)
}

/// Inverse of `export_json`.
pub fn parse_report(bytes: &[u8]) -> Result<LabReport, ExportError> {
    Ok(serde_json::from_slice(bytes)?)
}
