use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bracket of income taxed at a fixed marginal rate.
///
/// The bracket covers `(min_income, max_income]`; `max_income` is `None` for
/// the open-ended top slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSlab {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxSlab {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            rate,
        }
    }

    /// Portion of `income` that falls inside this slab.
    pub fn portion_of(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= self.min_income {
            return Decimal::ZERO;
        }
        let upper = match self.max_income {
            Some(max) => income.min(max),
            None => income,
        };
        upper - self.min_income
    }
}
