use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use itr_core::{
    DeductionLimits, FinancialYear, HraRules, NewTaxCalculation, Regime, RegimeRules,
    RepositoryError, TaxCalculation, TaxRepository, TaxSlab, TaxYearRules,
};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::decimal::{decimal_to_f64, get_decimal, get_optional_decimal};

const CALCULATION_COLUMNS: &str =
    "id, financial_year, income_json, deductions_json, result_json, created_at";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, creating the file if needed.
    ///
    /// Accepts a bare path (`itr.db`), a sqlx URL (`sqlite://itr.db`) or
    /// `:memory:`. An in-memory database lives only as long as its single
    /// connection, so the pool is capped at one.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_options = pool_options.max_connections(1).idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;
        info!(database = database_url, "connected to sqlite");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Executes every `.sql` file in `seeds_dir`, in filename order.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn get_regime_rules(
        &self,
        year: FinancialYear,
        regime: Regime,
    ) -> Result<RegimeRules, RepositoryError> {
        let row = sqlx::query(
            "SELECT standard_deduction, rebate_threshold
             FROM tax_regime_rules WHERE financial_year = ? AND regime = ?",
        )
        .bind(year.start_year())
        .bind(regime.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            RepositoryError::Database(format!("No {regime} regime rules stored for {year}"))
        })?;

        Ok(RegimeRules {
            regime,
            slabs: self.get_tax_slabs(year, regime).await?,
            standard_deduction: get_decimal(&row, "standard_deduction")?,
            rebate_threshold: get_decimal(&row, "rebate_threshold")?,
        })
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn get_financial_year(
    row: &SqliteRow,
    column: &str,
) -> Result<FinancialYear, RepositoryError> {
    let start: i32 = row.try_get(column).map_err(db_error)?;
    Ok(FinancialYear(start))
}

fn get_json<T: DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
) -> Result<T, RepositoryError> {
    let raw: String = row.try_get(column).map_err(db_error)?;
    serde_json::from_str(&raw)
        .map_err(|e| RepositoryError::Database(format!("Invalid JSON in '{column}': {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value)
        .map_err(|e| RepositoryError::Database(format!("Failed to encode JSON: {e}")))
}

fn row_to_tax_calculation(row: &SqliteRow) -> Result<TaxCalculation, RepositoryError> {
    Ok(TaxCalculation {
        id: row.try_get("id").map_err(db_error)?,
        financial_year: get_financial_year(row, "financial_year")?,
        income: get_json(row, "income_json")?,
        deductions: get_json(row, "deductions_json")?,
        result: get_json(row, "result_json")?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {e}")))?,
    })
}

#[async_trait]
impl TaxRepository for SqliteRepository {
    async fn get_tax_year_rules(
        &self,
        year: FinancialYear,
    ) -> Result<TaxYearRules, RepositoryError> {
        let row = sqlx::query(
            "SELECT financial_year, cess_rate,
                    limit_80c, limit_80d_self, limit_80d_self_senior,
                    limit_80d_parents, limit_80d_parents_senior,
                    limit_80ccd_1b, limit_80tta, limit_home_loan_interest,
                    hra_metro_rate, hra_non_metro_rate, hra_rent_excess_rate
             FROM tax_year_rules WHERE financial_year = ?",
        )
        .bind(year.start_year())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(TaxYearRules {
            financial_year: get_financial_year(&row, "financial_year")?,
            old_regime: self.get_regime_rules(year, Regime::Old).await?,
            new_regime: self.get_regime_rules(year, Regime::New).await?,
            deduction_limits: DeductionLimits {
                section_80c: get_decimal(&row, "limit_80c")?,
                section_80d_self: get_decimal(&row, "limit_80d_self")?,
                section_80d_self_senior: get_decimal(&row, "limit_80d_self_senior")?,
                section_80d_parents: get_decimal(&row, "limit_80d_parents")?,
                section_80d_parents_senior: get_decimal(&row, "limit_80d_parents_senior")?,
                section_80ccd_1b: get_decimal(&row, "limit_80ccd_1b")?,
                section_80tta: get_decimal(&row, "limit_80tta")?,
                home_loan_interest: get_decimal(&row, "limit_home_loan_interest")?,
            },
            hra: HraRules {
                metro_rate: get_decimal(&row, "hra_metro_rate")?,
                non_metro_rate: get_decimal(&row, "hra_non_metro_rate")?,
                rent_excess_rate: get_decimal(&row, "hra_rent_excess_rate")?,
            },
            cess_rate: get_decimal(&row, "cess_rate")?,
        })
    }

    async fn list_financial_years(&self) -> Result<Vec<FinancialYear>, RepositoryError> {
        let rows = sqlx::query("SELECT financial_year FROM tax_year_rules ORDER BY financial_year")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.iter()
            .map(|row| get_financial_year(row, "financial_year"))
            .collect()
    }

    async fn get_tax_slabs(
        &self,
        year: FinancialYear,
        regime: Regime,
    ) -> Result<Vec<TaxSlab>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT min_income, max_income, rate
             FROM tax_slabs
             WHERE financial_year = ? AND regime = ?
             ORDER BY min_income",
        )
        .bind(year.start_year())
        .bind(regime.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(|row| {
                Ok(TaxSlab {
                    min_income: get_decimal(row, "min_income")?,
                    max_income: get_optional_decimal(row, "max_income")?,
                    rate: get_decimal(row, "rate")?,
                })
            })
            .collect()
    }

    async fn replace_tax_slabs(
        &self,
        year: FinancialYear,
        regime: Regime,
        slabs: &[TaxSlab],
    ) -> Result<(), RepositoryError> {
        // dropped without commit on any error, which rolls back
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM tax_slabs WHERE financial_year = ? AND regime = ?")
            .bind(year.start_year())
            .bind(regime.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        for slab in slabs {
            sqlx::query(
                "INSERT INTO tax_slabs (financial_year, regime, min_income, max_income, rate)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(year.start_year())
            .bind(regime.as_str())
            .bind(decimal_to_f64(slab.min_income))
            .bind(slab.max_income.map(decimal_to_f64))
            .bind(decimal_to_f64(slab.rate))
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)
    }

    async fn create_calculation(
        &self,
        calc: NewTaxCalculation,
    ) -> Result<TaxCalculation, RepositoryError> {
        let now = Utc::now();
        let result = &calc.result;

        let inserted = sqlx::query(
            "INSERT INTO tax_calculation (
                financial_year, income_json, deductions_json, result_json,
                gross_total_income, tax_old_regime, tax_new_regime, recommended_regime,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(calc.financial_year().start_year())
        .bind(to_json(&calc.income)?)
        .bind(to_json(&calc.deductions)?)
        .bind(to_json(result)?)
        .bind(decimal_to_f64(result.gross_total_income))
        .bind(decimal_to_f64(result.tax_old_regime))
        .bind(decimal_to_f64(result.tax_new_regime))
        .bind(result.recommended_regime.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        let id = inserted.last_insert_rowid();
        debug!(id, year = %calc.financial_year(), "stored tax calculation");
        self.get_calculation(id).await
    }

    async fn get_calculation(
        &self,
        id: i64,
    ) -> Result<TaxCalculation, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {CALCULATION_COLUMNS} FROM tax_calculation WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(RepositoryError::NotFound)?;

        row_to_tax_calculation(&row)
    }

    async fn latest_calculation(&self) -> Result<TaxCalculation, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {CALCULATION_COLUMNS} FROM tax_calculation
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(RepositoryError::NotFound)?;

        row_to_tax_calculation(&row)
    }

    async fn list_calculations(
        &self,
        year: Option<FinancialYear>,
    ) -> Result<Vec<TaxCalculation>, RepositoryError> {
        let rows = match year {
            Some(year) => {
                sqlx::query(&format!(
                    "SELECT {CALCULATION_COLUMNS} FROM tax_calculation
                     WHERE financial_year = ? ORDER BY created_at DESC, id DESC"
                ))
                .bind(year.start_year())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {CALCULATION_COLUMNS} FROM tax_calculation
                     ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_error)?;

        rows.iter().map(row_to_tax_calculation).collect()
    }

    async fn delete_calculation(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tax_calculation WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
