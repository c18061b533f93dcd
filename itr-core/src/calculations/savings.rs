//! Unused deduction headroom under the old regime.

use rust_decimal::Decimal;

use crate::calculations::common::{capped, floor_at_zero};
use crate::calculations::deductions::DeductionAggregator;
use crate::calculations::slab_tax::SlabTaxCalculator;
use crate::error::TaxEngineError;
use crate::models::{DeductionInput, Regime, SavingOpportunity, TaxYearRules};

/// Suggests sections where more investment would lower old-regime tax.
#[derive(Debug, Clone)]
pub struct SavingsAdvisor<'a> {
    rules: &'a TaxYearRules,
}

impl<'a> SavingsAdvisor<'a> {
    pub fn new(rules: &'a TaxYearRules) -> Self {
        Self { rules }
    }

    /// One entry per section that still has room under its cap, in the
    /// order 80C, 80D (self), 80D (parents), 80CCD(1B).
    ///
    /// `potential_saving` is the old-regime tax, cess included, at
    /// `taxable_income_old` minus the tax once the remaining room is used.
    pub fn opportunities(
        &self,
        deductions: &DeductionInput,
        taxable_income_old: Decimal,
    ) -> Result<Vec<SavingOpportunity>, TaxEngineError> {
        let limits = &self.rules.deduction_limits;
        let (self_80d_limit, parents_80d_limit) =
            DeductionAggregator::new(self.rules).section_80d_limits(deductions);

        let sections = [
            (
                "80C",
                "Investments under Section 80C",
                limits.section_80c,
                deductions.section_80c.total(),
            ),
            (
                "80D",
                "Health insurance for self and family",
                self_80d_limit,
                deductions.section_80d.self_and_family,
            ),
            (
                "80D",
                "Health insurance for parents",
                parents_80d_limit,
                deductions.section_80d.parents,
            ),
            (
                "80CCD(1B)",
                "Additional NPS contribution",
                limits.section_80ccd_1b,
                deductions.nps_80ccd_1b,
            ),
        ];

        let calculator = SlabTaxCalculator::for_regime(self.rules, Regime::Old);
        let current_tax = calculator.breakdown(taxable_income_old)?.total_tax;

        let mut opportunities = Vec::new();
        for (section, title, max_amount, claimed) in sections {
            let used_amount = capped(claimed, max_amount);
            let remaining_amount = max_amount - used_amount;
            if remaining_amount <= Decimal::ZERO {
                continue;
            }
            let reduced = floor_at_zero(taxable_income_old - remaining_amount);
            let potential_saving = current_tax - calculator.breakdown(reduced)?.total_tax;
            opportunities.push(SavingOpportunity {
                section: section.to_string(),
                title: title.to_string(),
                max_amount,
                used_amount,
                remaining_amount,
                potential_saving,
            });
        }
        Ok(opportunities)
    }
}
