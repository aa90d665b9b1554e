//! Per-report interpretation rows. A unique key on `lab_result_id`
//! enforces at most one row per report at the store.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use labwise_core::models::interpretation::{InterpretationDetail, LabInterpretation};
use labwise_core::store::{InterpretationStore, StoreError};

use crate::client::{PostgrestClient, status_error, transport_error};

#[derive(Serialize)]
struct NewInterpretationRow<'a> {
    lab_result_id: Uuid,
    summary: &'a str,
    recommendations: &'a [String],
    interpretation: &'a InterpretationDetail,
    created_by: &'a str,
}

#[derive(Deserialize)]
struct InterpretationRow {
    summary: String,
    recommendations: Vec<String>,
    interpretation: InterpretationDetail,
}

impl From<InterpretationRow> for LabInterpretation {
    fn from(row: InterpretationRow) -> Self {
        LabInterpretation {
            summary: row.summary,
            recommendations: row.recommendations,
            interpretation: row.interpretation,
        }
    }
}

#[async_trait]
impl InterpretationStore for PostgrestClient {
    async fn find_interpretation(
        &self,
        report_id: Uuid,
    ) -> Result<Option<LabInterpretation>, StoreError> {
        let response = self
            .table(Method::GET, "report_interpretations")
            .query(&[
                ("lab_result_id", format!("eq.{report_id}")),
                (
                    "select",
                    "summary,recommendations,interpretation".to_string(),
                ),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        // An empty result set is the normal "not generated yet" branch.
        let mut rows: Vec<InterpretationRow> =
            response.json().await.map_err(transport_error)?;
        Ok(rows.pop().map(LabInterpretation::from))
    }

    async fn insert_interpretation(
        &self,
        report_id: Uuid,
        interpretation: &LabInterpretation,
        created_by: &str,
    ) -> Result<(), StoreError> {
        let row = NewInterpretationRow {
            lab_result_id: report_id,
            summary: &interpretation.summary,
            recommendations: &interpretation.recommendations,
            interpretation: &interpretation.interpretation,
            created_by,
        };

        let response = self
            .table(Method::POST, "report_interpretations")
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        info!(report_id = %report_id, "interpretation row inserted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_maps_onto_the_domain_shape() {
        let raw = r#"{
            "summary": "Mostly normal.",
            "recommendations": ["Recheck in 3 months"],
            "interpretation": {
                "concerning_values": [],
                "normal_values": ["Glucose"]
            }
        }"#;

        let row: InterpretationRow = serde_json::from_str(raw).unwrap();
        let interp: LabInterpretation = row.into();
        assert_eq!(interp.summary, "Mostly normal.");
        assert_eq!(interp.interpretation.normal_values, vec!["Glucose"]);
    }
}
