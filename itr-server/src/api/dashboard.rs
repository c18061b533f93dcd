use axum::Json;
use axum::extract::State;
use itr_core::{DashboardSummary, RepositoryError};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::wire::DashboardResponse;

/// Headline figures from the most recent calculation.
pub async fn dashboard_summary(State(state): State<AppState>) -> ApiResult<Json<DashboardResponse>> {
    let latest = state.repo.latest_calculation().await.map_err(|e| match e {
        RepositoryError::NotFound => ApiError::NotFound("no calculations yet".to_string()),
        other => other.into(),
    })?;

    Ok(Json(DashboardResponse {
        summary: DashboardSummary::from(&latest.result),
    }))
}
