use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;

/// Annual income of one filer for one financial year.
///
/// All amounts are annual. Callers holding monthly payslip figures must
/// annualize them first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeInput {
    pub basic: Decimal,
    /// House rent allowance received.
    pub hra: Decimal,
    pub special_allowance: Decimal,
    /// Leave travel allowance.
    pub lta: Decimal,
    /// Interest and any other income outside salary.
    pub other_income: Decimal,
    /// Subtracted from the final payable tax, never from taxable income.
    pub professional_tax_paid: Decimal,
    /// Subtracted from the final payable tax, never from taxable income.
    pub tds_already_deducted: Decimal,
    /// Used only for the old-regime HRA exemption.
    pub rent_paid: Decimal,
    pub is_metro_city: bool,
}

impl IncomeInput {
    /// Monetary fields paired with their wire names, in declaration order.
    pub fn amounts(&self) -> [(&'static str, Decimal); 8] {
        [
            ("basic", self.basic),
            ("hra", self.hra),
            ("special", self.special_allowance),
            ("lta", self.lta),
            ("otherIncome", self.other_income),
            ("professionalTax", self.professional_tax_paid),
            ("tdsAlreadyDeducted", self.tds_already_deducted),
            ("rentPaid", self.rent_paid),
        ]
    }

    /// Sum of every income component.
    ///
    /// Fails with [`TaxEngineError::AmountTooLarge`] naming the component
    /// whose addition overflowed.
    pub fn gross_total_income(&self) -> Result<Decimal, TaxEngineError> {
        [
            ("basic", self.basic),
            ("hra", self.hra),
            ("special", self.special_allowance),
            ("lta", self.lta),
            ("otherIncome", self.other_income),
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, (field, amount)| {
            sum.checked_add(amount)
                .ok_or(TaxEngineError::AmountTooLarge { field })
        })
    }

    /// Rejects the first negative or oversized amount.
    pub fn validate_amounts(&self) -> Result<(), TaxEngineError> {
        ensure_amounts_in_range(&self.amounts())
    }

    /// Rejects negative amounts, then a missing basic salary.
    pub fn validate(&self) -> Result<(), TaxEngineError> {
        self.validate_amounts()?;
        if self.basic.is_zero() {
            return Err(TaxEngineError::MissingRequiredField("basic"));
        }
        Ok(())
    }
}

/// Largest amount accepted for any single field, 10^15 rupees.
///
/// Sums and products of amounts under this bound stay far inside
/// [`Decimal::MAX`].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Checks one amount: negative is [`TaxEngineError::InvalidInput`], above
/// [`MAX_AMOUNT`] is [`TaxEngineError::AmountTooLarge`].
pub fn check_amount(
    field: &'static str,
    value: Decimal,
) -> Result<(), TaxEngineError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TaxEngineError::InvalidInput { field });
    }
    if value > MAX_AMOUNT {
        return Err(TaxEngineError::AmountTooLarge { field });
    }
    Ok(())
}

pub(crate) fn ensure_amounts_in_range(
    amounts: &[(&'static str, Decimal)],
) -> Result<(), TaxEngineError> {
    amounts
        .iter()
        .try_for_each(|&(field, value)| check_amount(field, value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn salaried() -> IncomeInput {
        IncomeInput {
            basic: dec!(600000),
            hra: dec!(240000),
            special_allowance: dec!(300000),
            other_income: dec!(10000),
            ..Default::default()
        }
    }

    #[test]
    fn gross_total_income_sums_components() {
        let mut income = salaried();
        income.lta = dec!(50000);

        assert_eq!(income.gross_total_income(), Ok(dec!(1200000)));
    }

    #[test]
    fn gross_excludes_tax_paid_and_rent() {
        let mut income = salaried();
        income.professional_tax_paid = dec!(2400);
        income.tds_already_deducted = dec!(60000);
        income.rent_paid = dec!(180000);

        assert_eq!(income.gross_total_income(), Ok(dec!(1150000)));
    }

    #[test]
    fn validate_accepts_valid_input() {
        assert_eq!(salaried().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_basic() {
        let income = IncomeInput::default();

        assert_eq!(
            income.validate(),
            Err(TaxEngineError::MissingRequiredField("basic"))
        );
    }

    #[test]
    fn validate_names_first_negative_field() {
        let mut income = salaried();
        income.lta = dec!(-1);
        income.rent_paid = dec!(-5);

        assert_eq!(
            income.validate(),
            Err(TaxEngineError::InvalidInput { field: "lta" })
        );
    }

    #[test]
    fn negative_basic_is_invalid_not_missing() {
        let mut income = salaried();
        income.basic = dec!(-100);

        assert_eq!(
            income.validate(),
            Err(TaxEngineError::InvalidInput { field: "basic" })
        );
    }

    #[test]
    fn negative_zero_is_accepted() {
        let mut income = salaried();
        income.hra = -dec!(0);

        assert_eq!(income.validate(), Ok(()));
    }

    #[test]
    fn max_amount_is_ten_to_the_fifteen() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
    }

    #[test]
    fn gross_overflow_names_component() {
        let income = IncomeInput {
            basic: Decimal::MAX,
            hra: Decimal::ONE,
            ..Default::default()
        };

        assert_eq!(
            income.gross_total_income(),
            Err(TaxEngineError::AmountTooLarge { field: "hra" })
        );
    }

    #[test]
    fn validate_rejects_amount_above_bound() {
        let mut income = salaried();
        income.other_income = MAX_AMOUNT + Decimal::ONE;

        assert_eq!(
            income.validate(),
            Err(TaxEngineError::AmountTooLarge {
                field: "otherIncome"
            })
        );
    }

    #[test]
    fn validate_accepts_amount_at_bound() {
        let mut income = salaried();
        income.basic = MAX_AMOUNT;

        assert_eq!(income.validate(), Ok(()));
    }
}
