use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FinancialYear, Regime};

/// Deductions the old regime allows, each already capped and rounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionSummary {
    /// 80C total before the cap was applied.
    #[serde(with = "rust_decimal::serde::float")]
    pub section_80c_claimed: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub section_80c: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub section_80d: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub section_80ccd_1b: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub section_80tta: Decimal,
    /// Sum of the four Chapter VI-A sections above.
    #[serde(with = "rust_decimal::serde::float")]
    pub chapter_6a: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub hra_exemption: Decimal,
    /// Sec 24(b), capped.
    #[serde(with = "rust_decimal::serde::float")]
    pub home_loan_interest: Decimal,
}

impl DeductionSummary {
    /// Everything subtracted from gross income under the old regime.
    pub fn total(&self) -> Decimal {
        self.chapter_6a + self.hra_exemption + self.home_loan_interest
    }
}

/// How one regime's tax was arrived at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeTaxBreakdown {
    pub regime: Regime,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_before_rebate: Decimal,
    /// Sec 87A rebate; either zero or the whole of `tax_before_rebate`.
    #[serde(with = "rust_decimal::serde::float")]
    pub rebate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_before_cess: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cess: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,
}

/// An old-regime section with headroom left under its cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingOpportunity {
    /// Statutory section, e.g. `80C`.
    pub section: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub used_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amount: Decimal,
    /// Old-regime tax (with cess) saved by using the remaining headroom.
    #[serde(with = "rust_decimal::serde::float")]
    pub potential_saving: Decimal,
}

/// Output of one engine run. Never partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub financial_year: FinancialYear,
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_deductions: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_income_old: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_income_new: Decimal,
    /// Old-regime tax including cess.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_old_regime: Decimal,
    /// New-regime tax including cess.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_new_regime: Decimal,
    pub recommended_regime: Regime,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_savings: Decimal,
    /// Negative when the filer is due a refund.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_tax_payable: Decimal,
    pub deductions: DeductionSummary,
    pub old_regime: RegimeTaxBreakdown,
    pub new_regime: RegimeTaxBreakdown,
    pub saving_opportunities: Vec<SavingOpportunity>,
}

impl TaxResult {
    pub fn breakdown(
        &self,
        regime: Regime,
    ) -> &RegimeTaxBreakdown {
        match regime {
            Regime::Old => &self.old_regime,
            Regime::New => &self.new_regime,
        }
    }

    /// Tax including cess under the recommended regime.
    pub fn recommended_tax(&self) -> Decimal {
        self.breakdown(self.recommended_regime).total_tax
    }
}
