use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itr_data::TaxSlabLoader;
use itr_db_sqlite::SqliteRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Load income-tax slab tables from a CSV file into the database.
///
/// The CSV file should have the following columns:
/// - financial_year: e.g. 2024-25
/// - regime: old or new
/// - min_income: lower bound of the slab
/// - max_income: upper bound (empty for the top slab)
/// - rate: marginal rate as a decimal (e.g. 0.05)
///
/// Each (financial_year, regime) in the file replaces the stored table.
#[derive(Parser, Debug)]
#[command(name = "itr-slab-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing slab data
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database path or URL
    #[arg(short, long, default_value = "itr.db")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        info!("running migrations");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
    }

    if let Some(seeds_dir) = &args.seeds {
        info!(dir = %seeds_dir.display(), "running seeds");
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
    }

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = TaxSlabLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
    info!(records = records.len(), file = %args.file.display(), "parsed slab records");

    let inserted = TaxSlabLoader::load(&repo, &records)
        .await
        .context("Failed to load tax slabs into database")?;

    info!(inserted, "slab tables loaded");
    Ok(())
}
