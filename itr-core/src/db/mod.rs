//! Storage seam. The engine never touches a database; backends implement
//! [`TaxRepository`] and register a [`RepositoryFactory`].

pub mod factory;
pub mod repository;

pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use repository::{RepositoryError, TaxRepository};
