//! Tax computation for Indian salaried filers.
//!
//! Each step is its own calculator borrowing the year's rule table; the
//! [`TaxEngine`] runs them in order and assembles the result.

pub mod common;
pub mod deductions;
pub mod engine;
pub mod regime;
pub mod savings;
pub mod slab_tax;

pub use deductions::DeductionAggregator;
pub use engine::TaxEngine;
pub use regime::{RegimeComparison, compare_regimes};
pub use savings::SavingsAdvisor;
pub use slab_tax::SlabTaxCalculator;
