use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    FinancialYear, NewTaxCalculation, Regime, TaxCalculation, TaxSlab, TaxYearRules,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait TaxRepository: Send + Sync {
    // Rule tables
    async fn get_tax_year_rules(
        &self,
        year: FinancialYear,
    ) -> Result<TaxYearRules, RepositoryError>;
    async fn list_financial_years(&self) -> Result<Vec<FinancialYear>, RepositoryError>;

    // Tax slabs
    async fn get_tax_slabs(
        &self,
        year: FinancialYear,
        regime: Regime,
    ) -> Result<Vec<TaxSlab>, RepositoryError>;

    /// Swaps the whole slab table of one (year, regime) for `slabs`.
    ///
    /// All or nothing: on error the previous table is left in place.
    async fn replace_tax_slabs(
        &self,
        year: FinancialYear,
        regime: Regime,
        slabs: &[TaxSlab],
    ) -> Result<(), RepositoryError>;

    // Stored calculations
    async fn create_calculation(
        &self,
        calc: NewTaxCalculation,
    ) -> Result<TaxCalculation, RepositoryError>;

    async fn get_calculation(&self, id: i64) -> Result<TaxCalculation, RepositoryError>;

    /// Most recently stored calculation, [`RepositoryError::NotFound`] when
    /// nothing has been stored.
    async fn latest_calculation(&self) -> Result<TaxCalculation, RepositoryError>;

    /// Newest first, optionally limited to one financial year.
    async fn list_calculations(
        &self,
        year: Option<FinancialYear>,
    ) -> Result<Vec<TaxCalculation>, RepositoryError>;

    async fn delete_calculation(&self, id: i64) -> Result<(), RepositoryError>;
}
