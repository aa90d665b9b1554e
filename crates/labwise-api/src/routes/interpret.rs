use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use labwise_core::models::interpretation::LabInterpretation;
use labwise_core::store::ReportStore;
use labwise_interpret::policy::InterpretationFlow;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Fetch-or-generate the interpretation for a report.
///
/// Each POST drives a fresh flow from `CheckingExisting`, which makes
/// this endpoint double as the manual retry entry point: a stored row is
/// returned as-is, otherwise exactly one generation call runs.
pub async fn interpret_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<LabInterpretation>, ApiError> {
    let store = state.store_for(&user.token);
    let generator = state.interpreter();

    // Ownership check and generation payload in one lookup.
    let report = store.get_report(id, &user.sub).await?;

    let mut flow = InterpretationFlow::new(report.id);
    let interpretation = flow
        .run(&store, &generator, &report, &user.sub)
        .await?
        .clone();

    Ok(Json(interpretation))
}
