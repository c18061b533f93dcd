//! JSON shapes exchanged with the dashboard.

use itr_core::{
    DashboardSummary, DeductionInput, IncomeInput, Section80C, Section80D, TaxCalculation,
    TaxEngineError, TaxResult, check_amount,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FINANCIAL_YEAR: &str = "2024-25";

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// How salary figures in a request are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    #[default]
    Annual,
    Monthly,
}

impl PayPeriod {
    fn annualize(
        self,
        field: &'static str,
        amount: Decimal,
    ) -> Result<Decimal, TaxEngineError> {
        match self {
            PayPeriod::Annual => Ok(amount),
            PayPeriod::Monthly => amount
                .checked_mul(MONTHS_PER_YEAR)
                .ok_or(TaxEngineError::AmountTooLarge { field }),
        }
    }
}

/// Flat body of `POST /api/calculate-tax`. Absent amounts are zero.
///
/// With [`PayPeriod::Monthly`] the payslip fields (`basic`, `hra`,
/// `special`, `lta`, `epfContribution`, `professionalTax`,
/// `tdsAlreadyDeducted`, `rentPaid`) are multiplied by 12. Investments and
/// `otherIncome` are always annual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculateTaxRequest {
    pub financial_year: Option<String>,
    pub pay_period: PayPeriod,

    pub basic: Decimal,
    pub hra: Decimal,
    pub special: Decimal,
    pub lta: Decimal,
    pub other_income: Decimal,
    /// Employee EPF contribution. Counts towards 80C unless
    /// `deduction80C_epf` is given.
    pub epf_contribution: Decimal,
    pub professional_tax: Decimal,
    pub tds_already_deducted: Decimal,
    pub rent_paid: Decimal,
    pub is_metro_city: bool,

    #[serde(rename = "deduction80C_epf")]
    pub deduction_80c_epf: Option<Decimal>,
    #[serde(rename = "deduction80C_elss")]
    pub deduction_80c_elss: Decimal,
    #[serde(rename = "deduction80C_lifeInsurance")]
    pub deduction_80c_life_insurance: Decimal,
    #[serde(rename = "deduction80C_ppf")]
    pub deduction_80c_ppf: Decimal,
    #[serde(rename = "deduction80C_tuitionFees")]
    pub deduction_80c_tuition_fees: Decimal,
    #[serde(rename = "deduction80C_homeLoanPrincipal")]
    pub deduction_80c_home_loan_principal: Decimal,
    #[serde(rename = "deduction80D_selfAndFamily")]
    pub deduction_80d_self_and_family: Decimal,
    #[serde(rename = "deduction80D_parents")]
    pub deduction_80d_parents: Decimal,
    pub is_self_senior: bool,
    pub is_parent_senior: bool,
    #[serde(rename = "deduction80CCD1B_nps")]
    pub deduction_80ccd_1b_nps: Decimal,
    #[serde(rename = "deduction80TTA_savingsInterest")]
    pub deduction_80tta_savings_interest: Decimal,
    pub home_loan_interest: Decimal,
}

impl CalculateTaxRequest {
    pub fn financial_year(&self) -> &str {
        self.financial_year
            .as_deref()
            .unwrap_or(DEFAULT_FINANCIAL_YEAR)
    }

    /// Splits the body into engine inputs, annualizing payslip figures.
    ///
    /// Fails when annualizing overflows, or when `epfContribution` stands in
    /// for `deduction80C_epf` and is out of range. Errors name the field the
    /// caller sent.
    pub fn to_inputs(&self) -> Result<(IncomeInput, DeductionInput), TaxEngineError> {
        let period = self.pay_period;
        let epf = match self.deduction_80c_epf {
            Some(epf) => epf,
            None => {
                let epf = period.annualize("epfContribution", self.epf_contribution)?;
                check_amount("epfContribution", epf)?;
                epf
            }
        };

        let income = IncomeInput {
            basic: period.annualize("basic", self.basic)?,
            hra: period.annualize("hra", self.hra)?,
            special_allowance: period.annualize("special", self.special)?,
            lta: period.annualize("lta", self.lta)?,
            other_income: self.other_income,
            professional_tax_paid: period.annualize("professionalTax", self.professional_tax)?,
            tds_already_deducted: period
                .annualize("tdsAlreadyDeducted", self.tds_already_deducted)?,
            rent_paid: period.annualize("rentPaid", self.rent_paid)?,
            is_metro_city: self.is_metro_city,
        };

        let deductions = DeductionInput {
            section_80c: Section80C {
                epf,
                elss: self.deduction_80c_elss,
                life_insurance: self.deduction_80c_life_insurance,
                ppf: self.deduction_80c_ppf,
                tuition_fees: self.deduction_80c_tuition_fees,
                home_loan_principal: self.deduction_80c_home_loan_principal,
            },
            section_80d: Section80D {
                self_and_family: self.deduction_80d_self_and_family,
                parents: self.deduction_80d_parents,
                is_self_senior: self.is_self_senior,
                is_parent_senior: self.is_parent_senior,
            },
            nps_80ccd_1b: self.deduction_80ccd_1b_nps,
            savings_interest_80tta: self.deduction_80tta_savings_interest,
            home_loan_interest: self.home_loan_interest,
        };

        Ok((income, deductions))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateTaxResponse {
    pub calculated_tax_details: TaxResult,
    pub calculation_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub summary: DashboardSummary,
}

#[derive(Debug, Serialize)]
pub struct CalculationsResponse {
    pub calculations: Vec<TaxCalculation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationsQuery {
    pub financial_year: Option<String>,
}
