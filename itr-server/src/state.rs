use std::sync::Arc;

use itr_core::{RuleBook, TaxEngine, TaxRepository};

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TaxRepository>,
    /// Read-only; built once at startup.
    pub rules: Arc<RuleBook>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn TaxRepository>,
        rules: RuleBook,
    ) -> Self {
        Self {
            repo,
            rules: Arc::new(rules),
        }
    }

    pub fn engine(&self) -> TaxEngine<'_> {
        TaxEngine::new(&self.rules)
    }
}
