use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::test::TestResult;

/// The immutable snapshot of a patient's test entries, created once at
/// submission time. `results` keeps insertion order for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LabReport {
    pub id: Uuid,
    pub patient_name: String,
    pub patient_id: String,
    pub date: jiff::Timestamp,
    pub results: Vec<TestResult>,
}

impl LabReport {
    /// Report date as `YYYY-MM-DD`, used in export filenames.
    pub fn date_stamp(&self) -> String {
        self.date.strftime("%Y-%m-%d").to_string()
    }

    /// Report date as a human heading, e.g. "January 5, 2026".
    pub fn date_display(&self) -> String {
        self.date.strftime("%B %-d, %Y").to_string()
    }
}
