//! Loads income-tax slab tables from CSV into any [`itr_core::TaxRepository`].

mod loader;

pub use loader::{TaxSlabLoader, TaxSlabLoaderError, TaxSlabRecord};
