use labwise_core::models::report::LabReport;

/// Download filename shared by all export targets:
/// `lab-report-{patientId}-{YYYY-MM-DD}.{ext}`.
pub fn export_filename(report: &LabReport, extension: &str) -> String {
    format!(
        "lab-report-{}-{}.{}",
        report.patient_id,
        report.date_stamp(),
        extension
    )
}
