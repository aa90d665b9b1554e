//! CSV rendering: three metadata lines, a blank line, then a fixed-order
//! table (Test Name, Value, Unit, Status, Reference Range).

use labwise_core::models::report::LabReport;

const HEADERS: [&str; 5] = ["Test Name", "Value", "Unit", "Status", "Reference Range"];

pub fn export_csv(report: &LabReport) -> String {
    let mut lines = vec![
        format!("Patient Name: {}", report.patient_name),
        format!("Patient ID: {}", report.patient_id),
        format!("Date: {}", report.date_display()),
        String::new(),
        HEADERS.join(","),
    ];

    for test in &report.results {
        let value = test
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        let row = [
            test.test_name.as_str(),
            value.as_str(),
            test.unit.as_str(),
            &test.status.to_string(),
            &test.reference_range.to_string(),
        ]
        .map(quote_field)
        .join(",");
        lines.push(row);
    }

    lines.join("\n")
}

/// Quote a field when it carries a comma, quote, or newline.
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
