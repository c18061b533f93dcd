use axum::Json;
use axum::extract::State;
use itr_core::FinancialYear;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxYearsResponse {
    /// Oldest first.
    pub financial_years: Vec<FinancialYear>,
    pub latest: Option<FinancialYear>,
}

pub async fn list_tax_years(State(state): State<AppState>) -> Json<TaxYearsResponse> {
    Json(TaxYearsResponse {
        financial_years: state.rules.financial_years(),
        latest: state.rules.latest().map(|rules| rules.financial_year),
    })
}
