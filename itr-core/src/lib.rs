//! Income-tax computation engine for Indian salaried filers.
//!
//! The engine is a set of pure functions over versioned rule tables: it
//! aggregates deductions, computes slab tax under the old and new regimes,
//! adds cess and recommends the cheaper regime. Persistence lives behind the
//! [`TaxRepository`] trait and is implemented by backend crates.

pub mod calculations;
pub mod db;
pub mod error;
pub mod models;
pub mod rules;

pub use calculations::TaxEngine;
pub use db::repository::{RepositoryError, TaxRepository};
pub use error::TaxEngineError;
pub use models::*;
pub use rules::RuleBook;
