//! Prompt construction for the interpretation request.
//!
//! The prompt carries the full report payload (patient identity and every
//! test row with name, value, unit, range, and status) plus the JSON
//! response-shape instructions the decoder expects.

use labwise_core::models::report::LabReport;

pub const SYSTEM_PROMPT: &str = "\
You are a medical lab assistant AI that helps interpret lab results. \
Provide clear, professional analysis while noting that these are general \
interpretations and patients should consult healthcare providers for \
specific medical advice.";

const RESPONSE_SHAPE: &str = r#"Format the response as JSON with the following structure:
{
  "summary": "overall summary",
  "recommendations": ["recommendation1", "recommendation2", ...],
  "interpretation": {
    "concerning_values": [{
      "test_name": "name",
      "value": "value",
      "implication": "what this might mean"
    }],
    "normal_values": ["test1", "test2"]
  }
}"#;

/// Build the user prompt for a report. Deterministic: the same report
/// always produces the same text.
pub fn build_report_prompt(report: &LabReport) -> String {
    let mut prompt = format!(
        "Analyze the following lab test results for patient {} (ID: {}):\n",
        report.patient_name, report.patient_id
    );

    for test in &report.results {
        let value = test
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "not entered".to_string());
        prompt.push_str(&format!(
            "\nTest: {}\nValue: {} {}\nReference Range: {} {}\nStatus: {}\n",
            test.test_name, value, test.unit, test.reference_range, test.unit, test.status
        ));
    }

    prompt.push_str(
        "\nPlease provide:\n\
         1. A brief summary of the overall results\n\
         2. List any concerning values and possible implications\n\
         3. General health recommendations based on these results\n",
    );
    prompt.push_str(RESPONSE_SHAPE);
    prompt
}
