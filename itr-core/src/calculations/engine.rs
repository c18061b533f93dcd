//! Engine entry point: one deterministic pass from inputs to [`TaxResult`].
//!
//! # Sequence
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Reject negative amounts, then a missing basic salary |
//! | 2    | Resolve the financial year's rule table |
//! | 3    | Gross total income (sum of income components) |
//! | 4    | Aggregate old-regime deductions and HRA exemption |
//! | 5    | Taxable income per regime, floored at zero |
//! | 6    | Slab tax, Sec 87A rebate and cess per regime |
//! | 7    | Compare regimes |
//! | 8    | Remaining payable after TDS and professional tax |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itr_core::{DeductionInput, IncomeInput, Regime, RuleBook, Section80C, TaxEngine};
//!
//! let rules = RuleBook::builtin();
//! let engine = TaxEngine::new(&rules);
//!
//! let income = IncomeInput {
//!     basic: dec!(600000),
//!     hra: dec!(240000),
//!     special_allowance: dec!(300000),
//!     other_income: dec!(10000),
//!     ..Default::default()
//! };
//! let deductions = DeductionInput {
//!     section_80c: Section80C { epf: dec!(150000), ..Default::default() },
//!     ..Default::default()
//! };
//!
//! let result = engine.calculate_tax(&income, &deductions, "2024-25").unwrap();
//!
//! assert_eq!(result.tax_old_regime, dec!(117000));
//! assert_eq!(result.tax_new_regime, dec!(63700));
//! assert_eq!(result.recommended_regime, Regime::New);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{floor_at_zero, round_down_rupee};
use crate::calculations::deductions::DeductionAggregator;
use crate::calculations::regime::compare_regimes;
use crate::calculations::savings::SavingsAdvisor;
use crate::calculations::slab_tax::SlabTaxCalculator;
use crate::error::TaxEngineError;
use crate::models::{DeductionInput, IncomeInput, Regime, TaxResult};
use crate::rules::RuleBook;

/// Stateless calculator over a [`RuleBook`].
///
/// Holds only a shared reference, so one engine can serve concurrent callers.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    rules: &'a RuleBook,
}

impl<'a> TaxEngine<'a> {
    pub fn new(rules: &'a RuleBook) -> Self {
        Self { rules }
    }

    /// Computes both regimes and recommends one.
    ///
    /// # Errors
    ///
    /// Checked in this order, before any computation:
    /// - [`TaxEngineError::InvalidInput`] for the first negative amount
    /// - [`TaxEngineError::AmountTooLarge`] for an amount above
    ///   [`crate::MAX_AMOUNT`]
    /// - [`TaxEngineError::MissingRequiredField`] when `basic` is zero
    /// - [`TaxEngineError::UnsupportedTaxYear`] when the year has no table
    pub fn calculate_tax(
        &self,
        income: &IncomeInput,
        deductions: &DeductionInput,
        financial_year: &str,
    ) -> Result<TaxResult, TaxEngineError> {
        income.validate_amounts()?;
        deductions.validate()?;
        income.validate()?;
        let year = self.rules.resolve(financial_year)?;

        let gross_total_income = round_down_rupee(income.gross_total_income()?);
        let summary = DeductionAggregator::new(year).aggregate(income, deductions)?;
        let total_deductions = summary.total();

        let taxable_income_old = self.taxable_income(
            gross_total_income,
            year.old_regime.standard_deduction + total_deductions,
        );
        let taxable_income_new =
            self.taxable_income(gross_total_income, year.new_regime.standard_deduction);

        let old_regime =
            SlabTaxCalculator::for_regime(year, Regime::Old).breakdown(taxable_income_old)?;
        let new_regime =
            SlabTaxCalculator::for_regime(year, Regime::New).breakdown(taxable_income_new)?;

        let comparison = compare_regimes(old_regime.total_tax, new_regime.total_tax);
        let recommended_tax = match comparison.recommended {
            Regime::Old => old_regime.total_tax,
            Regime::New => new_regime.total_tax,
        };
        let remaining_tax_payable =
            recommended_tax - income.tds_already_deducted - income.professional_tax_paid;

        let saving_opportunities =
            SavingsAdvisor::new(year).opportunities(deductions, taxable_income_old)?;

        debug!(
            year = %year.financial_year,
            %gross_total_income,
            %taxable_income_old,
            %taxable_income_new,
            tax_old = %old_regime.total_tax,
            tax_new = %new_regime.total_tax,
            recommended = %comparison.recommended,
            "calculated tax"
        );

        Ok(TaxResult {
            financial_year: year.financial_year,
            gross_total_income,
            total_deductions,
            taxable_income_old,
            taxable_income_new,
            tax_old_regime: old_regime.total_tax,
            tax_new_regime: new_regime.total_tax,
            recommended_regime: comparison.recommended,
            estimated_savings: comparison.savings,
            remaining_tax_payable,
            deductions: summary,
            old_regime,
            new_regime,
            saving_opportunities,
        })
    }

    /// Pre-cess slab tax for one regime, after the Sec 87A rebate.
    ///
    /// # Errors
    ///
    /// - [`TaxEngineError::InvalidInput`] for a negative taxable income
    /// - [`TaxEngineError::UnsupportedTaxYear`] when the year has no table
    pub fn compute_slab_tax(
        &self,
        taxable_income: Decimal,
        regime: Regime,
        financial_year: &str,
    ) -> Result<Decimal, TaxEngineError> {
        let year = self.rules.resolve(financial_year)?;
        SlabTaxCalculator::for_regime(year, regime).slab_tax(taxable_income)
    }

    /// Calculates taxable income.
    fn taxable_income(
        &self,
        gross: Decimal,
        deductions: Decimal,
    ) -> Decimal {
        floor_at_zero(round_down_rupee(gross - deductions))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{FinancialYear, Section80C, Section80D};

    fn scenario_a_income() -> IncomeInput {
        IncomeInput {
            basic: dec!(600000),
            hra: dec!(240000),
            special_allowance: dec!(300000),
            other_income: dec!(10000),
            ..Default::default()
        }
    }

    fn full_80c() -> DeductionInput {
        DeductionInput {
            section_80c: Section80C {
                epf: dec!(72000),
                elss: dec!(78000),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn calculate(
        income: &IncomeInput,
        deductions: &DeductionInput,
        year: &str,
    ) -> Result<TaxResult, TaxEngineError> {
        let rules = RuleBook::builtin();
        TaxEngine::new(&rules).calculate_tax(income, deductions, year)
    }

    // =========================================================================
    // Scenario tests
    // =========================================================================

    #[test]
    fn scenario_a_salaried_with_full_80c() {
        let result = calculate(&scenario_a_income(), &full_80c(), "2024-25").unwrap();

        assert_eq!(result.financial_year, FinancialYear(2024));
        assert_eq!(result.gross_total_income, dec!(1150000));
        assert_eq!(result.total_deductions, dec!(150000));
        assert_eq!(result.taxable_income_old, dec!(1000000));
        assert_eq!(result.taxable_income_new, dec!(1075000));
        assert_eq!(result.tax_old_regime, dec!(117000));
        assert_eq!(result.tax_new_regime, dec!(63700));
        assert_eq!(result.recommended_regime, Regime::New);
        assert_eq!(result.estimated_savings, dec!(53300));
        assert_eq!(result.remaining_tax_payable, dec!(63700));
    }

    #[test]
    fn scenario_b_zero_basic_is_missing() {
        let result = calculate(&IncomeInput::default(), &DeductionInput::default(), "2024-25");

        assert_eq!(result, Err(TaxEngineError::MissingRequiredField("basic")));
    }

    #[test]
    fn scenario_c_negative_elss_is_invalid() {
        let mut deductions = full_80c();
        deductions.section_80c.elss = dec!(-5000);

        let result = calculate(&scenario_a_income(), &deductions, "2024-25");

        assert_eq!(
            result,
            Err(TaxEngineError::InvalidInput {
                field: "deduction80C_elss"
            })
        );
    }

    #[test]
    fn scenario_d_80c_is_capped() {
        let deductions = DeductionInput {
            section_80c: Section80C {
                epf: dec!(100000),
                ppf: dec!(60000),
                life_insurance: dec!(40000),
                ..Default::default()
            },
            ..Default::default()
        };

        let result = calculate(&scenario_a_income(), &deductions, "2024-25").unwrap();

        assert_eq!(result.deductions.section_80c_claimed, dec!(200000));
        assert_eq!(result.deductions.chapter_6a, dec!(150000));
        assert_eq!(result.taxable_income_old, dec!(1000000));
    }

    #[test]
    fn scenario_e_tie_recommends_old() {
        // both regimes land inside their rebates
        let income = IncomeInput {
            basic: dec!(300000),
            ..Default::default()
        };

        let result = calculate(&income, &DeductionInput::default(), "2024-25").unwrap();

        assert_eq!(result.tax_old_regime, dec!(0));
        assert_eq!(result.tax_new_regime, dec!(0));
        assert_eq!(result.recommended_regime, Regime::Old);
        assert_eq!(result.estimated_savings, dec!(0));
    }

    #[test]
    fn heavy_deductions_favour_old_regime() {
        let mut income = scenario_a_income();
        income.rent_paid = dec!(300000);
        income.is_metro_city = true;
        let deductions = DeductionInput {
            section_80c: Section80C {
                epf: dec!(150000),
                ..Default::default()
            },
            section_80d: Section80D {
                self_and_family: dec!(25000),
                parents: dec!(25000),
                ..Default::default()
            },
            nps_80ccd_1b: dec!(50000),
            home_loan_interest: dec!(200000),
            ..Default::default()
        };

        let result = calculate(&income, &deductions, "2024-25").unwrap();

        // HRA: min(240000, 240000, 300000)
        assert_eq!(result.deductions.hra_exemption, dec!(240000));
        assert_eq!(result.total_deductions, dec!(690000));
        assert_eq!(result.taxable_income_old, dec!(460000));
        assert_eq!(result.tax_old_regime, dec!(0));
        assert_eq!(result.recommended_regime, Regime::Old);
        assert_eq!(result.estimated_savings, dec!(63700));
    }

    // =========================================================================
    // Validation order tests
    // =========================================================================

    #[test]
    fn negative_amount_reported_before_missing_basic() {
        let deductions = DeductionInput {
            nps_80ccd_1b: dec!(-1),
            ..Default::default()
        };

        let result = calculate(&IncomeInput::default(), &deductions, "2024-25");

        assert_eq!(
            result,
            Err(TaxEngineError::InvalidInput {
                field: "deduction80CCD1B_nps"
            })
        );
    }

    #[test]
    fn overflowing_income_is_rejected_not_panicking() {
        let income = IncomeInput {
            basic: Decimal::MAX,
            hra: Decimal::ONE,
            ..Default::default()
        };

        let result = calculate(&income, &DeductionInput::default(), "2024-25");

        assert_eq!(result, Err(TaxEngineError::AmountTooLarge { field: "basic" }));
    }

    #[test]
    fn every_field_at_bound_still_computes() {
        let income = IncomeInput {
            basic: crate::MAX_AMOUNT,
            hra: crate::MAX_AMOUNT,
            special_allowance: crate::MAX_AMOUNT,
            lta: crate::MAX_AMOUNT,
            other_income: crate::MAX_AMOUNT,
            rent_paid: crate::MAX_AMOUNT,
            is_metro_city: true,
            ..Default::default()
        };
        let deductions = DeductionInput {
            section_80c: Section80C {
                epf: crate::MAX_AMOUNT,
                elss: crate::MAX_AMOUNT,
                ..Default::default()
            },
            home_loan_interest: crate::MAX_AMOUNT,
            ..Default::default()
        };

        let result = calculate(&income, &deductions, "2024-25").unwrap();

        assert_eq!(result.gross_total_income, crate::MAX_AMOUNT * dec!(5));
        assert!(result.tax_old_regime > Decimal::ZERO);
        assert!(result.tax_new_regime > Decimal::ZERO);
    }

    #[test]
    fn missing_basic_reported_before_unknown_year() {
        let result = calculate(&IncomeInput::default(), &DeductionInput::default(), "1999-00");

        assert_eq!(result, Err(TaxEngineError::MissingRequiredField("basic")));
    }

    #[test]
    fn unknown_year_is_unsupported() {
        let result = calculate(&scenario_a_income(), &full_80c(), "2030-31");

        assert_eq!(
            result,
            Err(TaxEngineError::UnsupportedTaxYear("2030-31".to_string()))
        );
    }

    // =========================================================================
    // Payable tax tests
    // =========================================================================

    #[test]
    fn tds_and_professional_tax_reduce_payable_only() {
        let mut income = scenario_a_income();
        income.tds_already_deducted = dec!(50000);
        income.professional_tax_paid = dec!(2500);

        let result = calculate(&income, &full_80c(), "2024-25").unwrap();

        assert_eq!(result.taxable_income_new, dec!(1075000));
        assert_eq!(result.remaining_tax_payable, dec!(11200));
    }

    #[test]
    fn excess_tds_gives_negative_payable() {
        let mut income = scenario_a_income();
        income.tds_already_deducted = dec!(80000);

        let result = calculate(&income, &full_80c(), "2024-25").unwrap();

        assert_eq!(result.remaining_tax_payable, dec!(-16300));
    }

    // =========================================================================
    // Property tests
    // =========================================================================

    #[test]
    fn taxable_income_never_negative() {
        let income = IncomeInput {
            basic: dec!(50000),
            ..Default::default()
        };
        let deductions = DeductionInput {
            home_loan_interest: dec!(200000),
            nps_80ccd_1b: dec!(50000),
            ..Default::default()
        };

        let result = calculate(&income, &deductions, "2024-25").unwrap();

        assert_eq!(result.taxable_income_old, dec!(0));
        assert_eq!(result.taxable_income_new, dec!(0));
        assert_eq!(result.tax_old_regime, dec!(0));
    }

    #[test]
    fn calculation_is_idempotent() {
        let rules = RuleBook::builtin();
        let engine = TaxEngine::new(&rules);
        let income = scenario_a_income();
        let deductions = full_80c();

        let first = engine.calculate_tax(&income, &deductions, "2025-26").unwrap();
        let second = engine.calculate_tax(&income, &deductions, "2025-26").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn same_income_differs_by_year() {
        let older = calculate(&scenario_a_income(), &full_80c(), "2023-24").unwrap();
        let newer = calculate(&scenario_a_income(), &full_80c(), "FY2025-26").unwrap();

        // 1100000 under FY2023-24 new slabs: 15000 + 30000 + 30000
        assert_eq!(older.taxable_income_new, dec!(1100000));
        assert_eq!(older.new_regime.tax_before_cess, dec!(75000));
        // 1075000 is inside the FY2025-26 rebate
        assert_eq!(newer.tax_new_regime, dec!(0));
    }

    // =========================================================================
    // compute_slab_tax tests
    // =========================================================================

    #[test]
    fn compute_slab_tax_is_pre_cess() {
        let rules = RuleBook::builtin();
        let engine = TaxEngine::new(&rules);

        let tax = engine
            .compute_slab_tax(dec!(1100000), Regime::New, "2024-25")
            .unwrap();

        assert_eq!(tax, dec!(65000));
    }

    #[test]
    fn compute_slab_tax_unknown_year() {
        let rules = RuleBook::builtin();
        let engine = TaxEngine::new(&rules);

        let result = engine.compute_slab_tax(dec!(100), Regime::Old, "2010-11");

        assert_eq!(
            result,
            Err(TaxEngineError::UnsupportedTaxYear("2010-11".to_string()))
        );
    }
}
