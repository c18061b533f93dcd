use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use itr_core::{FinancialYear, NewTaxCalculation, TaxCalculation, TaxEngineError};
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::wire::{CalculateTaxRequest, CalculateTaxResponse, CalculationsQuery, CalculationsResponse};

/// Runs the engine on the request and stores the outcome.
///
/// Nothing is stored when the engine rejects the input.
pub async fn calculate_tax(
    State(state): State<AppState>,
    payload: Result<Json<CalculateTaxRequest>, JsonRejection>,
) -> ApiResult<Json<CalculateTaxResponse>> {
    let Json(request) = payload?;
    let (income, deductions) = request.to_inputs()?;

    let result = state
        .engine()
        .calculate_tax(&income, &deductions, request.financial_year())?;
    debug!(
        year = %result.financial_year,
        recommended = %result.recommended_regime,
        "tax calculated"
    );

    let stored = state
        .repo
        .create_calculation(NewTaxCalculation {
            income,
            deductions,
            result,
        })
        .await?;
    info!(id = stored.id, year = %stored.financial_year, "calculation stored");

    Ok(Json(CalculateTaxResponse {
        calculated_tax_details: stored.result,
        calculation_id: stored.id,
    }))
}

/// Stored calculations, newest first, optionally for one financial year.
pub async fn list_calculations(
    State(state): State<AppState>,
    query: Result<Query<CalculationsQuery>, QueryRejection>,
) -> ApiResult<Json<CalculationsResponse>> {
    let Query(query) = query?;
    let year = match query.financial_year.as_deref() {
        Some(label) => Some(
            FinancialYear::parse(label)
                .ok_or_else(|| TaxEngineError::UnsupportedTaxYear(label.to_string()))?,
        ),
        None => None,
    };

    let calculations = state.repo.list_calculations(year).await?;
    Ok(Json(CalculationsResponse { calculations }))
}

pub async fn get_calculation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaxCalculation>> {
    Ok(Json(state.repo.get_calculation(id).await?))
}

pub async fn delete_calculation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.repo.delete_calculation(id).await?;
    info!(id, "calculation deleted");
    Ok(StatusCode::NO_CONTENT)
}
