//! Progressive slab tax for one regime.

use rust_decimal::Decimal;

use crate::calculations::common::round_down_rupee;
use crate::error::TaxEngineError;
use crate::models::{Regime, RegimeRules, RegimeTaxBreakdown, TaxYearRules};

/// Computes tax for one regime of one year.
///
/// Slabs are taken as given; [`TaxYearRules::validate`] is what guarantees
/// they are ordered and contiguous.
#[derive(Debug, Clone)]
pub struct SlabTaxCalculator<'a> {
    rules: &'a RegimeRules,
    cess_rate: Decimal,
}

impl<'a> SlabTaxCalculator<'a> {
    pub fn new(
        rules: &'a RegimeRules,
        cess_rate: Decimal,
    ) -> Self {
        Self { rules, cess_rate }
    }

    /// Calculator for `regime` using the year's cess rate.
    pub fn for_regime(
        year: &'a TaxYearRules,
        regime: Regime,
    ) -> Self {
        Self::new(year.regime(regime), year.cess_rate)
    }

    /// Tax before cess, after the Sec 87A rebate, in whole rupees.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidInput`] for a negative taxable income.
    pub fn slab_tax(
        &self,
        taxable_income: Decimal,
    ) -> Result<Decimal, TaxEngineError> {
        Ok(self.breakdown(taxable_income)?.tax_before_cess)
    }

    /// Full computation including rebate and cess.
    pub fn breakdown(
        &self,
        taxable_income: Decimal,
    ) -> Result<RegimeTaxBreakdown, TaxEngineError> {
        if taxable_income < Decimal::ZERO {
            return Err(TaxEngineError::InvalidInput {
                field: "taxableIncome",
            });
        }

        let tax_before_rebate = self.marginal_tax(taxable_income);
        let rebate = self.rebate(taxable_income, tax_before_rebate);
        let tax_before_cess = tax_before_rebate - rebate;
        let cess = round_down_rupee(tax_before_cess * self.cess_rate);

        Ok(RegimeTaxBreakdown {
            regime: self.rules.regime,
            taxable_income,
            tax_before_rebate,
            rebate,
            tax_before_cess,
            cess,
            total_tax: tax_before_cess + cess,
        })
    }

    /// Sum of each slab's portion at that slab's rate.
    fn marginal_tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let tax: Decimal = self
            .rules
            .slabs
            .iter()
            .take_while(|slab| taxable_income > slab.min_income)
            .map(|slab| slab.portion_of(taxable_income) * slab.rate)
            .sum();
        round_down_rupee(tax)
    }

    /// Sec 87A wipes out the whole tax at or below the threshold.
    fn rebate(
        &self,
        taxable_income: Decimal,
        tax: Decimal,
    ) -> Decimal {
        if taxable_income <= self.rules.rebate_threshold {
            tax
        } else {
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rules::builtin;

    fn slab_tax(
        year: &TaxYearRules,
        regime: Regime,
        taxable: Decimal,
    ) -> Decimal {
        SlabTaxCalculator::for_regime(year, regime)
            .slab_tax(taxable)
            .unwrap()
    }

    // =========================================================================
    // Old regime tests
    // =========================================================================

    #[test]
    fn old_regime_first_slab_is_untaxed() {
        let year = builtin::fy2024_25();

        assert_eq!(slab_tax(&year, Regime::Old, dec!(250000)), dec!(0));
    }

    #[test]
    fn old_regime_rebate_at_threshold() {
        let year = builtin::fy2024_25();

        assert_eq!(slab_tax(&year, Regime::Old, dec!(500000)), dec!(0));
    }

    #[test]
    fn old_regime_rebate_ends_above_threshold() {
        let year = builtin::fy2024_25();

        // 12500 on the second slab, 0.20 on the extra rupee rounds away
        assert_eq!(slab_tax(&year, Regime::Old, dec!(500001)), dec!(12500));
    }

    #[test]
    fn old_regime_top_slab() {
        let year = builtin::fy2024_25();

        // 12500 + 100000 + 30% of 500000
        assert_eq!(slab_tax(&year, Regime::Old, dec!(1500000)), dec!(262500));
    }

    #[test]
    fn old_regime_ten_lakh() {
        let year = builtin::fy2024_25();

        assert_eq!(slab_tax(&year, Regime::Old, dec!(1000000)), dec!(112500));
    }

    // =========================================================================
    // New regime tests
    // =========================================================================

    #[test]
    fn new_regime_fy2024_25_rebate_at_seven_lakh() {
        let year = builtin::fy2024_25();

        assert_eq!(slab_tax(&year, Regime::New, dec!(700000)), dec!(0));
    }

    #[test]
    fn new_regime_fy2024_25_eleven_lakh() {
        let year = builtin::fy2024_25();

        // 20000 + 30000 + 15000
        assert_eq!(slab_tax(&year, Regime::New, dec!(1100000)), dec!(65000));
    }

    #[test]
    fn new_regime_fy2023_24_uses_its_own_slabs() {
        let year = builtin::fy2023_24();

        // 15000 + 30000 + 15000
        assert_eq!(slab_tax(&year, Regime::New, dec!(1000000)), dec!(60000));
    }

    #[test]
    fn new_regime_fy2025_26_rebate_at_twelve_lakh() {
        let year = builtin::fy2025_26();

        assert_eq!(slab_tax(&year, Regime::New, dec!(1200000)), dec!(0));
    }

    #[test]
    fn new_regime_fy2025_26_sixteen_lakh() {
        let year = builtin::fy2025_26();

        // 20000 + 40000 + 60000
        assert_eq!(slab_tax(&year, Regime::New, dec!(1600000)), dec!(120000));
    }

    // =========================================================================
    // Boundary, rounding and property tests
    // =========================================================================

    #[test]
    fn zero_income_is_zero_tax() {
        let year = builtin::fy2024_25();

        for regime in Regime::ALL {
            assert_eq!(slab_tax(&year, regime, dec!(0)), dec!(0));
        }
    }

    #[test]
    fn threshold_rupee_is_taxed_at_lower_rate() {
        let year = builtin::fy2024_25();

        // at exactly 1000000 the 30% slab has not started
        let at = slab_tax(&year, Regime::Old, dec!(1000000));
        let above = slab_tax(&year, Regime::Old, dec!(1000010));

        assert_eq!(at, dec!(112500));
        assert_eq!(above, dec!(112503));
    }

    #[test]
    fn fractional_tax_rounds_down() {
        let year = builtin::fy2024_25();

        // 12500 + 0.20 * 5.5
        assert_eq!(slab_tax(&year, Regime::Old, dec!(500005.5)), dec!(12501));
    }

    #[test]
    fn negative_taxable_income_is_rejected() {
        let year = builtin::fy2024_25();

        let result = SlabTaxCalculator::for_regime(&year, Regime::New).slab_tax(dec!(-1));

        assert_eq!(
            result,
            Err(TaxEngineError::InvalidInput {
                field: "taxableIncome"
            })
        );
    }

    #[test]
    fn slab_tax_is_monotonic() {
        for year in builtin::all() {
            for regime in Regime::ALL {
                let calculator = SlabTaxCalculator::for_regime(&year, regime);
                let mut previous = Decimal::ZERO;
                let mut income = Decimal::ZERO;
                while income <= dec!(3000000) {
                    let tax = calculator.slab_tax(income).unwrap();
                    assert!(
                        tax >= previous,
                        "{} {regime}: tax fell from {previous} to {tax} at {income}",
                        year.financial_year
                    );
                    previous = tax;
                    income += dec!(2500);
                }
            }
        }
    }

    #[test]
    fn breakdown_adds_cess() {
        let year = builtin::fy2024_25();

        let breakdown = SlabTaxCalculator::for_regime(&year, Regime::New)
            .breakdown(dec!(1075000))
            .unwrap();

        assert_eq!(breakdown.tax_before_rebate, dec!(61250));
        assert_eq!(breakdown.rebate, dec!(0));
        assert_eq!(breakdown.cess, dec!(2450));
        assert_eq!(breakdown.total_tax, dec!(63700));
    }

    #[test]
    fn breakdown_records_rebate() {
        let year = builtin::fy2024_25();

        let breakdown = SlabTaxCalculator::for_regime(&year, Regime::Old)
            .breakdown(dec!(480000))
            .unwrap();

        assert_eq!(breakdown.tax_before_rebate, dec!(11500));
        assert_eq!(breakdown.rebate, dec!(11500));
        assert_eq!(breakdown.total_tax, dec!(0));
    }
}
