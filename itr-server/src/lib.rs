//! HTTP front end for the income-tax engine.
//!
//! Exposes the engine over JSON, stores every calculation through the
//! configured [`itr_core::TaxRepository`] backend and serves the dashboard
//! summary from the latest one.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod wire;

pub use api::create_router;
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use state::AppState;
