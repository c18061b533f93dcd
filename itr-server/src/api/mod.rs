//! HTTP routes.

pub mod calculations;
pub mod dashboard;
pub mod health;
pub mod tax_years;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/calculate-tax", post(calculations::calculate_tax))
        .route("/api/calculations", get(calculations::list_calculations))
        .route(
            "/api/calculations/{id}",
            get(calculations::get_calculation).delete(calculations::delete_calculation),
        )
        .route("/api/dashboard-summary", get(dashboard::dashboard_summary))
        .route("/api/tax-years", get(tax_years::list_tax_years));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
