use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use labwise_core::store::ReportStore;
use labwise_export::filename::export_filename;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
}

/// Render a stored report to the requested format and hand the bytes to
/// the download sink.
pub async fn export_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let store = state.store_for(&user.token);
    let report = store.get_report(id, &user.sub).await?;

    let (bytes, content_type, extension) = match req.format {
        ExportFormat::Json => (
            labwise_export::json::export_json(&report)?,
            "application/json",
            "json",
        ),
        ExportFormat::Csv => (
            labwise_export::csv::export_csv(&report).into_bytes(),
            "text/csv",
            "csv",
        ),
        ExportFormat::Pdf => (
            labwise_export::pdf::export_pdf(&report)?,
            "application/pdf",
            "pdf",
        ),
    };

    let filename = export_filename(&report, extension);
    let response = (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response();

    Ok(response)
}
