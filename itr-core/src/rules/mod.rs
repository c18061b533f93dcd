//! Versioned rule tables, keyed by financial year.

pub mod builtin;

use std::collections::BTreeMap;

use crate::error::TaxEngineError;
use crate::models::{FinancialYear, TaxYearRules};

/// The set of financial years the engine can compute.
///
/// Adding a year is a data change: insert its [`TaxYearRules`] and the engine
/// picks it up without any code change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBook {
    years: BTreeMap<FinancialYear, TaxYearRules>,
}

impl RuleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule book holding every year shipped with the engine.
    pub fn builtin() -> Self {
        let years = builtin::all()
            .into_iter()
            .map(|rules| (rules.financial_year, rules))
            .collect();
        Self { years }
    }

    /// Adds or replaces a year's table after validating it.
    pub fn insert(
        &mut self,
        rules: TaxYearRules,
    ) -> Result<(), TaxEngineError> {
        rules.validate()?;
        self.years.insert(rules.financial_year, rules);
        Ok(())
    }

    pub fn get(
        &self,
        year: FinancialYear,
    ) -> Option<&TaxYearRules> {
        self.years.get(&year)
    }

    /// Parses a year label and looks up its table.
    ///
    /// Fails with [`TaxEngineError::UnsupportedTaxYear`] carrying the label as
    /// given when it cannot be parsed or has no table.
    pub fn resolve(
        &self,
        label: &str,
    ) -> Result<&TaxYearRules, TaxEngineError> {
        FinancialYear::parse(label)
            .and_then(|year| self.get(year))
            .ok_or_else(|| TaxEngineError::UnsupportedTaxYear(label.to_string()))
    }

    /// Supported years, oldest first.
    pub fn financial_years(&self) -> Vec<FinancialYear> {
        self.years.keys().copied().collect()
    }

    pub fn latest(&self) -> Option<&TaxYearRules> {
        self.years.values().next_back()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn builtin_carries_shipped_years() {
        let book = RuleBook::builtin();

        assert_eq!(
            book.financial_years(),
            vec![FinancialYear(2023), FinancialYear(2024), FinancialYear(2025)]
        );
        assert_eq!(book.latest().map(|r| r.financial_year), Some(FinancialYear(2025)));
    }

    #[test]
    fn resolve_accepts_prefixed_label() {
        let book = RuleBook::builtin();

        let rules = book.resolve("FY2024-25").unwrap();

        assert_eq!(rules.financial_year, FinancialYear(2024));
    }

    #[test]
    fn resolve_unknown_year_keeps_raw_label() {
        let book = RuleBook::builtin();

        assert_eq!(
            book.resolve("2019-20"),
            Err(TaxEngineError::UnsupportedTaxYear("2019-20".to_string()))
        );
        assert_eq!(
            book.resolve("next year"),
            Err(TaxEngineError::UnsupportedTaxYear("next year".to_string()))
        );
    }

    #[test]
    fn insert_replaces_existing_year() {
        let mut book = RuleBook::builtin();
        let mut rules = builtin::fy2024_25();
        rules.new_regime.standard_deduction = dec!(100000);

        book.insert(rules).unwrap();

        let stored = book.get(FinancialYear(2024)).unwrap();
        assert_eq!(stored.new_regime.standard_deduction, dec!(100000));
        assert_eq!(book.financial_years().len(), 3);
    }

    #[test]
    fn insert_rejects_invalid_table() {
        let mut book = RuleBook::new();
        let mut rules = builtin::fy2024_25();
        rules.old_regime.slabs.clear();

        assert!(book.insert(rules).is_err());
        assert!(book.is_empty());
    }
}
