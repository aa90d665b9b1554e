//! Report assembler.
//!
//! Turns the in-progress working entries into an immutable `LabReport`
//! snapshot. Pure: persistence and quota consumption are sequenced by the
//! caller (see `submit`), never here.

use thiserror::Error;
use uuid::Uuid;

use crate::classify::ClassifyOptions;
use crate::models::report::LabReport;
use crate::models::test::TestResult;

/// Typed rejection of a submission. These surface as inline form messages,
/// so the text is user-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("please fill in patient details: patient name is required")]
    MissingPatientName,

    #[error("please fill in patient details: patient ID is required")]
    MissingPatientId,

    #[error("please add at least one test")]
    NoTests,
}

/// Assemble an immutable report from patient identity and test entries.
///
/// Statuses are recomputed through the evaluator on the way in, so the
/// snapshot can never disagree with live-edit classification. Later
/// mutation of the working entries does not affect the returned report.
pub fn assemble(
    patient_name: &str,
    patient_id: &str,
    entries: &[TestResult],
) -> Result<LabReport, AssembleError> {
    assemble_with(patient_name, patient_id, entries, &ClassifyOptions::default())
}

pub fn assemble_with(
    patient_name: &str,
    patient_id: &str,
    entries: &[TestResult],
    opts: &ClassifyOptions,
) -> Result<LabReport, AssembleError> {
    let patient_name = patient_name.trim();
    let patient_id = patient_id.trim();

    if patient_name.is_empty() {
        return Err(AssembleError::MissingPatientName);
    }
    if patient_id.is_empty() {
        return Err(AssembleError::MissingPatientId);
    }
    if entries.is_empty() {
        return Err(AssembleError::NoTests);
    }

    let results = entries
        .iter()
        .cloned()
        .map(|mut test| {
            test.reclassify(opts);
            test
        })
        .collect();

    Ok(LabReport {
        id: Uuid::new_v4(),
        patient_name: patient_name.to_string(),
        patient_id: patient_id.to_string(),
        date: jiff::Timestamp::now(),
        results,
    })
}
