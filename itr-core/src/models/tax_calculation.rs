use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DeductionInput, FinancialYear, IncomeInput, TaxResult};

/// A stored engine run: the inputs exactly as computed plus the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculation {
    pub id: i64,
    pub financial_year: FinancialYear,
    pub income: IncomeInput,
    pub deductions: DeductionInput,
    pub result: TaxResult,
    pub created_at: DateTime<Utc>,
}

/// For storing a new calculation (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaxCalculation {
    pub income: IncomeInput,
    pub deductions: DeductionInput,
    pub result: TaxResult,
}

impl NewTaxCalculation {
    pub fn financial_year(&self) -> FinancialYear {
        self.result.financial_year
    }
}
