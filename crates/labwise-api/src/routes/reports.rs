use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use labwise_core::models::report::LabReport;
use labwise_core::models::test::TestResult;
use labwise_core::store::ReportStore;
use labwise_core::submit::submit_report;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub patient_name: String,
    pub patient_id: String,
    pub tests: Vec<TestResult>,
}

/// Submit a report: quota read → validation → persist → credit consume,
/// strictly in that order. A rejection writes nothing.
pub async fn create_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<LabReport>), ApiError> {
    let store = state.store_for(&user.token);

    let report = submit_report(
        &store,
        &store,
        &req.patient_name,
        &req.patient_id,
        &req.tests,
        &user.sub,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_reports(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<LabReport>>, ApiError> {
    let store = state.store_for(&user.token);
    let reports = store.list_reports(&user.sub).await?;
    Ok(Json(reports))
}

pub async fn get_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<LabReport>, ApiError> {
    let store = state.store_for(&user.token);
    let report = store.get_report(id, &user.sub).await?;
    Ok(Json(report))
}
