use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::models::{FinancialYear, Regime, TaxSlab};

/// Slab table and regime-specific constants for one regime in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeRules {
    pub regime: Regime,
    /// Slabs in ascending order; the last one is open-ended.
    pub slabs: Vec<TaxSlab>,
    /// Flat deduction from gross income before slabs apply.
    pub standard_deduction: Decimal,
    /// Sec 87A: tax is zero when taxable income is at or below this amount.
    pub rebate_threshold: Decimal,
}

/// Statutory caps on deductions. Old regime only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionLimits {
    pub section_80c: Decimal,
    pub section_80d_self: Decimal,
    pub section_80d_self_senior: Decimal,
    pub section_80d_parents: Decimal,
    pub section_80d_parents_senior: Decimal,
    pub section_80ccd_1b: Decimal,
    pub section_80tta: Decimal,
    /// Sec 24(b), self-occupied property.
    pub home_loan_interest: Decimal,
}

/// Rates used by the HRA exemption formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HraRules {
    /// Share of basic salary allowed in metro cities.
    pub metro_rate: Decimal,
    /// Share of basic salary allowed elsewhere.
    pub non_metro_rate: Decimal,
    /// Rent is only exempt above this share of basic salary.
    pub rent_excess_rate: Decimal,
}

/// Everything that changes from one financial year to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxYearRules {
    pub financial_year: FinancialYear,
    pub old_regime: RegimeRules,
    pub new_regime: RegimeRules,
    pub deduction_limits: DeductionLimits,
    pub hra: HraRules,
    /// Health and education cess applied on top of slab tax.
    pub cess_rate: Decimal,
}

impl TaxYearRules {
    pub fn regime(
        &self,
        regime: Regime,
    ) -> &RegimeRules {
        match regime {
            Regime::Old => &self.old_regime,
            Regime::New => &self.new_regime,
        }
    }

    /// Checks that the table is usable by the slab calculator.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidRules`] if:
    /// - a regime table is stored under the wrong regime
    /// - a slab list is empty, does not start at zero, has gaps or overlaps,
    ///   or has an open-ended slab anywhere but last
    /// - any rate is outside `[0, 1]`
    /// - any limit or threshold is negative
    pub fn validate(&self) -> Result<(), TaxEngineError> {
        let invalid = |reason: String| TaxEngineError::InvalidRules {
            year: self.financial_year.to_string(),
            reason,
        };

        for (expected, rules) in [
            (Regime::Old, &self.old_regime),
            (Regime::New, &self.new_regime),
        ] {
            if rules.regime != expected {
                return Err(invalid(format!(
                    "{expected} regime table is labelled {}",
                    rules.regime
                )));
            }
            validate_slabs(&rules.slabs).map_err(|reason| invalid(format!("{expected}: {reason}")))?;
            if rules.standard_deduction < Decimal::ZERO || rules.rebate_threshold < Decimal::ZERO {
                return Err(invalid(format!(
                    "{expected}: standard deduction and rebate threshold must be non-negative"
                )));
            }
        }

        let limits = &self.deduction_limits;
        let caps = [
            limits.section_80c,
            limits.section_80d_self,
            limits.section_80d_self_senior,
            limits.section_80d_parents,
            limits.section_80d_parents_senior,
            limits.section_80ccd_1b,
            limits.section_80tta,
            limits.home_loan_interest,
        ];
        if caps.iter().any(|cap| *cap < Decimal::ZERO) {
            return Err(invalid("deduction limits must be non-negative".to_string()));
        }

        for (name, rate) in [
            ("cess rate", self.cess_rate),
            ("HRA metro rate", self.hra.metro_rate),
            ("HRA non-metro rate", self.hra.non_metro_rate),
            ("HRA rent excess rate", self.hra.rent_excess_rate),
        ] {
            if !is_unit_rate(rate) {
                return Err(invalid(format!("{name} must be between 0 and 1, got {rate}")));
            }
        }

        Ok(())
    }
}

fn is_unit_rate(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

/// Checks that slabs start at zero, are contiguous and end open-ended.
pub fn validate_slabs(slabs: &[TaxSlab]) -> Result<(), String> {
    let Some(first) = slabs.first() else {
        return Err("no slabs".to_string());
    };
    if first.min_income != Decimal::ZERO {
        return Err(format!("first slab starts at {}, expected 0", first.min_income));
    }

    for (i, slab) in slabs.iter().enumerate() {
        if !is_unit_rate(slab.rate) {
            return Err(format!("slab {i} rate {} is outside [0, 1]", slab.rate));
        }
        let is_last = i + 1 == slabs.len();
        match (slab.max_income, is_last) {
            (None, true) => {}
            (None, false) => return Err(format!("slab {i} is open-ended but not last")),
            (Some(_), true) => return Err("top slab must be open-ended".to_string()),
            (Some(max), false) => {
                if max <= slab.min_income {
                    return Err(format!("slab {i} is empty or inverted"));
                }
                let next_min = slabs[i + 1].min_income;
                if next_min != max {
                    return Err(format!(
                        "slab {} starts at {next_min} but slab {i} ends at {max}",
                        i + 1
                    ));
                }
            }
        }
    }

    Ok(())
}
