//! HTTP route handlers for the donor pages.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                          - Liveness check
//! GET  /health/ready                                    - Store connectivity check
//!
//! # Address pages (GET shows, POST submits)
//! /lpa/{lpa_id}/your-address
//! /lpa/{lpa_id}/certificate-provider-address
//! /lpa/{lpa_id}/independent-witness-address
//! /lpa/{lpa_id}/choose-attorneys-address/{uid}
//! /lpa/{lpa_id}/choose-replacement-attorneys-address/{uid}
//!
//! # Witnessing (GET shows, POST checks the code)
//! /lpa/{lpa_id}/witnessing-as-certificate-provider
//! /lpa/{lpa_id}/witnessing-as-independent-witness
//! POST /lpa/{lpa_id}/resend-witness-code/{actor}
//! ```

pub mod address;
pub mod witnessing;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the address page routes.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/lpa/{lpa_id}/your-address",
            get(address::donor).post(address::donor_submit),
        )
        .route(
            "/lpa/{lpa_id}/certificate-provider-address",
            get(address::certificate_provider).post(address::certificate_provider_submit),
        )
        .route(
            "/lpa/{lpa_id}/independent-witness-address",
            get(address::independent_witness).post(address::independent_witness_submit),
        )
        .route(
            "/lpa/{lpa_id}/choose-attorneys-address/{uid}",
            get(address::attorney).post(address::attorney_submit),
        )
        .route(
            "/lpa/{lpa_id}/choose-replacement-attorneys-address/{uid}",
            get(address::replacement_attorney).post(address::replacement_attorney_submit),
        )
}

/// Create the witnessing routes.
pub fn witnessing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/lpa/{lpa_id}/witnessing-as-certificate-provider",
            get(witnessing::certificate_provider).post(witnessing::certificate_provider_submit),
        )
        .route(
            "/lpa/{lpa_id}/witnessing-as-independent-witness",
            get(witnessing::independent_witness).post(witnessing::independent_witness_submit),
        )
        .route(
            "/lpa/{lpa_id}/resend-witness-code/{actor}",
            post(witnessing::resend),
        )
}

/// Create all routes for the donor pages.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(address_routes())
        .merge(witnessing_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "store not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
