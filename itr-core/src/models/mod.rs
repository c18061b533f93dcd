mod dashboard_summary;
mod deductions;
mod financial_year;
mod income;
mod regime;
mod tax_calculation;
mod tax_result;
mod tax_slab;
mod tax_year_rules;

pub use dashboard_summary::DashboardSummary;
pub use deductions::{DeductionInput, Section80C, Section80D};
pub use financial_year::FinancialYear;
pub use income::{IncomeInput, MAX_AMOUNT, check_amount};
pub use regime::Regime;
pub use tax_calculation::{NewTaxCalculation, TaxCalculation};
pub use tax_result::{DeductionSummary, RegimeTaxBreakdown, SavingOpportunity, TaxResult};
pub use tax_slab::TaxSlab;
pub use tax_year_rules::{DeductionLimits, HraRules, RegimeRules, TaxYearRules, validate_slabs};
