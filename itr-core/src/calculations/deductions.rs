//! Old-regime deduction aggregation.
//!
//! | Section | Treatment |
//! |---------|-----------|
//! | 80C     | All components summed, then capped as a group |
//! | 80D     | Self & family and parents capped independently, then added |
//! | 80CCD(1B) | Capped, separate from the 80C cap |
//! | 80TTA   | Capped |
//! | 24(b)   | Capped, reported apart from Chapter VI-A |
//! | HRA     | `min(hra, rent - 10% basic, 50%/40% basic)`, floored at zero |
//!
//! Every amount leaving the aggregator is a whole rupee.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{capped, floor_at_zero, round_down_rupee};
use crate::error::TaxEngineError;
use crate::models::{DeductionInput, DeductionSummary, IncomeInput, TaxYearRules};

/// Applies one year's deduction caps and HRA formula.
#[derive(Debug, Clone)]
pub struct DeductionAggregator<'a> {
    rules: &'a TaxYearRules,
}

impl<'a> DeductionAggregator<'a> {
    pub fn new(rules: &'a TaxYearRules) -> Self {
        Self { rules }
    }

    /// Caps every claimed deduction and computes the HRA exemption.
    ///
    /// HRA needs the salary and rent figures, so the income record is taken
    /// alongside the deductions.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidInput`] naming the first negative
    /// amount in either record.
    pub fn aggregate(
        &self,
        income: &IncomeInput,
        deductions: &DeductionInput,
    ) -> Result<DeductionSummary, TaxEngineError> {
        income.validate_amounts()?;
        deductions.validate()?;

        let limits = &self.rules.deduction_limits;

        let section_80c_claimed = round_down_rupee(deductions.section_80c.total());
        let section_80c = capped(section_80c_claimed, limits.section_80c);
        let section_80d = self.section_80d(deductions);
        let section_80ccd_1b = capped(deductions.nps_80ccd_1b, limits.section_80ccd_1b);
        let section_80tta = capped(deductions.savings_interest_80tta, limits.section_80tta);
        let chapter_6a = section_80c + section_80d + section_80ccd_1b + section_80tta;

        let hra_exemption = self.hra_exemption(income);
        let home_loan_interest = capped(deductions.home_loan_interest, limits.home_loan_interest);

        debug!(
            year = %self.rules.financial_year,
            %section_80c_claimed,
            %chapter_6a,
            %hra_exemption,
            %home_loan_interest,
            "aggregated deductions"
        );

        Ok(DeductionSummary {
            section_80c_claimed,
            section_80c,
            section_80d,
            section_80ccd_1b,
            section_80tta,
            chapter_6a,
            hra_exemption,
            home_loan_interest,
        })
    }

    /// Caps for self & family and for parents, raised for senior citizens.
    pub fn section_80d_limits(
        &self,
        deductions: &DeductionInput,
    ) -> (Decimal, Decimal) {
        let limits = &self.rules.deduction_limits;
        let d = &deductions.section_80d;
        let self_limit = if d.is_self_senior {
            limits.section_80d_self_senior
        } else {
            limits.section_80d_self
        };
        let parents_limit = if d.is_parent_senior {
            limits.section_80d_parents_senior
        } else {
            limits.section_80d_parents
        };
        (self_limit, parents_limit)
    }

    /// Sums the independently capped 80D parts.
    fn section_80d(
        &self,
        deductions: &DeductionInput,
    ) -> Decimal {
        let (self_limit, parents_limit) = self.section_80d_limits(deductions);
        let d = &deductions.section_80d;
        capped(d.self_and_family, self_limit) + capped(d.parents, parents_limit)
    }

    /// Least of HRA received, rent above the basic-salary share, and the
    /// city-dependent share of basic salary.
    fn hra_exemption(
        &self,
        income: &IncomeInput,
    ) -> Decimal {
        let hra = &self.rules.hra;
        let city_rate = if income.is_metro_city {
            hra.metro_rate
        } else {
            hra.non_metro_rate
        };

        let received = floor_at_zero(income.hra);
        let rent_excess = floor_at_zero(income.rent_paid - hra.rent_excess_rate * income.basic);
        let salary_share = floor_at_zero(city_rate * income.basic);

        round_down_rupee(received.min(rent_excess).min(salary_share))
    }
}
