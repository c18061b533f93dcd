//! Rule tables shipped with the engine.
//!
//! The SQLite seeds carry the same figures; a year present in the database
//! replaces the table defined here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    DeductionLimits, FinancialYear, HraRules, Regime, RegimeRules, TaxSlab, TaxYearRules,
};

/// Every shipped year, oldest first.
pub fn all() -> Vec<TaxYearRules> {
    vec![fy2023_24(), fy2024_25(), fy2025_26()]
}

pub fn fy2023_24() -> TaxYearRules {
    year(
        2023,
        slabs(&[
            (dec!(0), dec!(0)),
            (dec!(300000), dec!(0.05)),
            (dec!(600000), dec!(0.10)),
            (dec!(900000), dec!(0.15)),
            (dec!(1200000), dec!(0.20)),
            (dec!(1500000), dec!(0.30)),
        ]),
        dec!(50000),
        dec!(700000),
    )
}

pub fn fy2024_25() -> TaxYearRules {
    year(
        2024,
        slabs(&[
            (dec!(0), dec!(0)),
            (dec!(300000), dec!(0.05)),
            (dec!(700000), dec!(0.10)),
            (dec!(1000000), dec!(0.15)),
            (dec!(1200000), dec!(0.20)),
            (dec!(1500000), dec!(0.30)),
        ]),
        dec!(75000),
        dec!(700000),
    )
}

pub fn fy2025_26() -> TaxYearRules {
    year(
        2025,
        slabs(&[
            (dec!(0), dec!(0)),
            (dec!(400000), dec!(0.05)),
            (dec!(800000), dec!(0.10)),
            (dec!(1200000), dec!(0.15)),
            (dec!(1600000), dec!(0.20)),
            (dec!(2000000), dec!(0.25)),
            (dec!(2400000), dec!(0.30)),
        ]),
        dec!(75000),
        dec!(1200000),
    )
}

/// Old-regime slabs have not changed across the shipped years.
fn old_regime() -> RegimeRules {
    RegimeRules {
        regime: Regime::Old,
        slabs: slabs(&[
            (dec!(0), dec!(0)),
            (dec!(250000), dec!(0.05)),
            (dec!(500000), dec!(0.20)),
            (dec!(1000000), dec!(0.30)),
        ]),
        standard_deduction: Decimal::ZERO,
        rebate_threshold: dec!(500000),
    }
}

fn year(
    start_year: i32,
    new_slabs: Vec<TaxSlab>,
    new_standard_deduction: Decimal,
    new_rebate_threshold: Decimal,
) -> TaxYearRules {
    TaxYearRules {
        financial_year: FinancialYear(start_year),
        old_regime: old_regime(),
        new_regime: RegimeRules {
            regime: Regime::New,
            slabs: new_slabs,
            standard_deduction: new_standard_deduction,
            rebate_threshold: new_rebate_threshold,
        },
        deduction_limits: DeductionLimits {
            section_80c: dec!(150000),
            section_80d_self: dec!(25000),
            section_80d_self_senior: dec!(50000),
            section_80d_parents: dec!(25000),
            section_80d_parents_senior: dec!(50000),
            section_80ccd_1b: dec!(50000),
            section_80tta: dec!(10000),
            home_loan_interest: dec!(200000),
        },
        hra: HraRules {
            metro_rate: dec!(0.50),
            non_metro_rate: dec!(0.40),
            rent_excess_rate: dec!(0.10),
        },
        cess_rate: dec!(0.04),
    }
}

/// Builds contiguous slabs from `(lower bound, rate)` pairs; the last is open.
fn slabs(bounds: &[(Decimal, Decimal)]) -> Vec<TaxSlab> {
    bounds
        .iter()
        .enumerate()
        .map(|(i, (min, rate))| {
            let max = bounds.get(i + 1).map(|(next, _)| *next);
            TaxSlab::new(*min, max, *rate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slabs_chain_bounds() {
        let built = slabs(&[(dec!(0), dec!(0)), (dec!(100), dec!(0.1))]);

        assert_eq!(
            built,
            vec![
                TaxSlab::new(dec!(0), Some(dec!(100)), dec!(0)),
                TaxSlab::new(dec!(100), None, dec!(0.1)),
            ]
        );
    }

    #[test]
    fn years_are_consecutive() {
        let years: Vec<_> = all().iter().map(|r| r.financial_year.to_string()).collect();

        assert_eq!(years, vec!["2023-24", "2024-25", "2025-26"]);
    }

    #[test]
    fn fy2025_26_has_seven_new_slabs() {
        assert_eq!(fy2025_26().new_regime.slabs.len(), 7);
    }
}
