use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::models::income::ensure_amounts_in_range;

/// Section 80C components. Capped as a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section80C {
    pub epf: Decimal,
    pub elss: Decimal,
    pub life_insurance: Decimal,
    pub ppf: Decimal,
    pub tuition_fees: Decimal,
    pub home_loan_principal: Decimal,
}

impl Section80C {
    pub fn total(&self) -> Decimal {
        self.epf + self.elss + self.life_insurance + self.ppf + self.tuition_fees + self.home_loan_principal
    }
}

/// Section 80D health insurance premiums. Each part has its own cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section80D {
    pub self_and_family: Decimal,
    pub parents: Decimal,
    /// Raises the self & family cap.
    pub is_self_senior: bool,
    /// Raises the parents cap.
    pub is_parent_senior: bool,
}

/// Itemized deductions claimed by the filer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeductionInput {
    pub section_80c: Section80C,
    pub section_80d: Section80D,
    /// Section 80CCD(1B), NPS contribution.
    pub nps_80ccd_1b: Decimal,
    /// Section 80TTA, savings account interest.
    pub savings_interest_80tta: Decimal,
    /// Section 24(b), interest on a self-occupied home loan.
    pub home_loan_interest: Decimal,
}

impl DeductionInput {
    /// Monetary fields paired with their wire names, in declaration order.
    pub fn amounts(&self) -> [(&'static str, Decimal); 11] {
        let c = &self.section_80c;
        let d = &self.section_80d;
        [
            ("deduction80C_epf", c.epf),
            ("deduction80C_elss", c.elss),
            ("deduction80C_lifeInsurance", c.life_insurance),
            ("deduction80C_ppf", c.ppf),
            ("deduction80C_tuitionFees", c.tuition_fees),
            ("deduction80C_homeLoanPrincipal", c.home_loan_principal),
            ("deduction80D_selfAndFamily", d.self_and_family),
            ("deduction80D_parents", d.parents),
            ("deduction80CCD1B_nps", self.nps_80ccd_1b),
            ("deduction80TTA_savingsInterest", self.savings_interest_80tta),
            ("homeLoanInterest", self.home_loan_interest),
        ]
    }

    pub fn validate(&self) -> Result<(), TaxEngineError> {
        ensure_amounts_in_range(&self.amounts())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn section_80c_total_sums_all_components() {
        let c = Section80C {
            epf: dec!(72000),
            elss: dec!(50000),
            life_insurance: dec!(25000),
            ppf: dec!(10000),
            tuition_fees: dec!(20000),
            home_loan_principal: dec!(23000),
        };

        assert_eq!(c.total(), dec!(200000));
    }

    #[test]
    fn validate_names_negative_elss() {
        let mut deductions = DeductionInput::default();
        deductions.section_80c.elss = dec!(-5000);

        assert_eq!(
            deductions.validate(),
            Err(TaxEngineError::InvalidInput {
                field: "deduction80C_elss"
            })
        );
    }

    #[test]
    fn validate_names_negative_home_loan_interest() {
        let deductions = DeductionInput {
            home_loan_interest: dec!(-1),
            ..Default::default()
        };

        assert_eq!(
            deductions.validate(),
            Err(TaxEngineError::InvalidInput {
                field: "homeLoanInterest"
            })
        );
    }

    #[test]
    fn empty_deductions_are_valid() {
        assert_eq!(DeductionInput::default().validate(), Ok(()));
    }

    #[test]
    fn deserializes_partial_json() {
        let json = r#"{"section80c": {"elss": "50000"}, "nps80ccd1b": 20000}"#;

        let parsed: DeductionInput = serde_json::from_str(json).expect("should parse");

        assert_eq!(parsed.section_80c.elss, dec!(50000));
        assert_eq!(parsed.nps_80ccd_1b, dec!(20000));
        assert_eq!(parsed.section_80d, Section80D::default());
    }
}
