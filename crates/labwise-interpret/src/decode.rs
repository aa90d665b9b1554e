//! Explicit decode of the LLM response into a `LabInterpretation`.
//!
//! The top level must be a JSON object; each optional field independently
//! falls back to a documented default when absent or malformed. The result
//! is always fully typed, never a partially-patched value.

use serde_json::Value;

use labwise_core::models::interpretation::{
    ConcerningValue, InterpretationDetail, LabInterpretation,
};

use crate::error::InterpretError;

/// Substituted when the response carries no usable `summary` string.
pub const DEFAULT_SUMMARY: &str = "No summary was provided for these results.";

/// Decode a raw response body.
///
/// Fails only when the body is not a JSON object at the top level; every
/// field-level problem degrades to its default instead.
pub fn decode_interpretation(raw: &str) -> Result<LabInterpretation, InterpretError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| InterpretError::Decode(format!("response is not valid JSON: {e}")))?;

    let Some(obj) = value.as_object() else {
        return Err(InterpretError::Decode(
            "top level of response is not a JSON object".to_string(),
        ));
    };

    let summary = obj
        .get("summary")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    let recommendations = string_list(obj.get("recommendations"));

    let detail = obj.get("interpretation").and_then(Value::as_object);
    let concerning_values = detail
        .and_then(|d| d.get("concerning_values"))
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(concerning_value).collect())
        .unwrap_or_default();
    let normal_values = string_list(detail.and_then(|d| d.get("normal_values")));

    Ok(LabInterpretation {
        summary,
        recommendations,
        interpretation: InterpretationDetail {
            concerning_values,
            normal_values,
        },
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn concerning_value(entry: &Value) -> Option<ConcerningValue> {
    let obj = entry.as_object()?;
    Some(ConcerningValue {
        test_name: obj.get("test_name")?.as_str()?.to_string(),
        value: obj.get("value")?.as_str()?.to_string(),
        implication: obj.get("implication")?.as_str()?.to_string(),
    })
}
