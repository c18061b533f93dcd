use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FinancialYear, Regime, TaxResult};

/// Headline figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub financial_year: FinancialYear,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_annual_gross: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_tax_old_regime: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_tax_new_regime: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_tax_savings: Decimal,
    pub recommended_regime: Regime,
}

impl From<&TaxResult> for DashboardSummary {
    fn from(result: &TaxResult) -> Self {
        Self {
            financial_year: result.financial_year,
            estimated_annual_gross: result.gross_total_income,
            estimated_tax_old_regime: result.tax_old_regime,
            estimated_tax_new_regime: result.tax_new_regime,
            estimated_tax_savings: result.estimated_savings,
            recommended_regime: result.recommended_regime,
        }
    }
}
