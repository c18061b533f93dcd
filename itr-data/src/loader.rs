use std::collections::BTreeMap;
use std::io::Read;

use itr_core::{FinancialYear, Regime, RepositoryError, TaxRepository, TaxSlab, validate_slabs};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading slab data.
#[derive(Debug, Error)]
pub enum TaxSlabLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid financial year '{0}' (expected e.g. 2024-25)")]
    InvalidFinancialYear(String),

    #[error("Invalid regime '{0}' (expected 'old' or 'new')")]
    InvalidRegime(String),

    #[error("Invalid {regime} regime slabs for {year}: {reason}")]
    InvalidSlabs {
        year: FinancialYear,
        regime: Regime,
        reason: String,
    },

    #[error("Financial year {0} not found in database (have you run the seeds?)")]
    TaxYearNotFound(FinancialYear),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for TaxSlabLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxSlabLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a slab CSV file.
///
/// - `financial_year`: e.g. `2024-25`
/// - `regime`: `old` or `new`
/// - `min_income`: lower bound of the slab
/// - `max_income`: upper bound, empty for the open-ended top slab
/// - `rate`: marginal rate as a decimal (0.05 for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxSlabRecord {
    pub financial_year: String,
    pub regime: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

type SlabTables = BTreeMap<(FinancialYear, Regime), Vec<TaxSlab>>;

/// Loader for slab tables, backend-agnostic through [`TaxRepository`].
pub struct TaxSlabLoader;

impl TaxSlabLoader {
    /// Parses slab records from any CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxSlabRecord>, TaxSlabLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxSlabRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records into one slab table per (year, regime), sorted by
    /// lower bound, and checks each table is contiguous and ends open.
    pub fn group(records: &[TaxSlabRecord]) -> Result<SlabTables, TaxSlabLoaderError> {
        let mut tables = SlabTables::new();

        for record in records {
            let year = FinancialYear::parse(&record.financial_year).ok_or_else(|| {
                TaxSlabLoaderError::InvalidFinancialYear(record.financial_year.clone())
            })?;
            let regime = Regime::parse(&record.regime)
                .ok_or_else(|| TaxSlabLoaderError::InvalidRegime(record.regime.clone()))?;
            tables.entry((year, regime)).or_default().push(TaxSlab::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        for ((year, regime), slabs) in tables.iter_mut() {
            slabs.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            validate_slabs(slabs).map_err(|reason| TaxSlabLoaderError::InvalidSlabs {
                year: *year,
                regime: *regime,
                reason,
            })?;
        }

        Ok(tables)
    }

    /// Replaces the stored slabs of every (year, regime) present in
    /// `records`. Returns the number of slabs inserted.
    ///
    /// Every table is validated before anything is written, and each table is
    /// swapped in as a whole, so a failure never leaves a half-written table
    /// and loading the same file twice leaves the same result.
    pub async fn load<R: TaxRepository + ?Sized>(
        repo: &R,
        records: &[TaxSlabRecord],
    ) -> Result<usize, TaxSlabLoaderError> {
        let tables = Self::group(records)?;
        let known_years = repo.list_financial_years().await?;

        if let Some((year, _)) = tables.keys().find(|(year, _)| !known_years.contains(year)) {
            return Err(TaxSlabLoaderError::TaxYearNotFound(*year));
        }

        let mut inserted = 0;
        for ((year, regime), slabs) in &tables {
            repo.replace_tax_slabs(*year, *regime, slabs)
                .await
                .map_err(|e| match e {
                    RepositoryError::Database(ref inner)
                        if inner.contains("FOREIGN KEY constraint failed") =>
                    {
                        TaxSlabLoaderError::TaxYearNotFound(*year)
                    }
                    other => TaxSlabLoaderError::Repository(other),
                })?;
            inserted += slabs.len();
            debug!(%year, %regime, slabs = slabs.len(), "replaced slab table");
        }

        info!(tables = tables.len(), inserted, "loaded tax slabs");
        Ok(inserted)
    }
}
