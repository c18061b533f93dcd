use std::sync::Arc;

use itr_core::db::{DbConfig, RepositoryRegistry};
use itr_core::{RepositoryError, RuleBook, TaxRepository};
use itr_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Builds a [`RepositoryRegistry`] with every backend compiled into this binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Starts from the built-in tables and overlays every year stored in `repo`.
///
/// A stored year that fails validation is skipped with a warning and the
/// built-in table for that year, if any, stays in effect.
pub async fn load_rule_book(repo: &dyn TaxRepository) -> Result<RuleBook, RepositoryError> {
    let mut book = RuleBook::builtin();

    for year in repo.list_financial_years().await? {
        let rules = repo.get_tax_year_rules(year).await?;
        match book.insert(rules) {
            Ok(()) => debug!(%year, "loaded stored rule table"),
            Err(e) => warn!(%year, error = %e, "ignoring invalid stored rule table"),
        }
    }

    info!(years = ?book.financial_years(), "rule book ready");
    Ok(book)
}

/// Opens the configured backend and loads the rule book.
pub async fn build_state(config: &DbConfig) -> anyhow::Result<AppState> {
    debug!(backend = %config.backend, "connecting to repository");
    let repo: Arc<dyn TaxRepository> = Arc::from(build_registry().create(config).await?);
    let rules = load_rule_book(repo.as_ref()).await?;
    Ok(AppState::new(repo, rules))
}
