//! Liveness and readiness probes

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Database file the server was started with
    pub database: String,
}

/// Readiness report with a snapshot of the store
#[derive(Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    pub books: i64,
    pub users: i64,
    /// Loans not yet returned
    pub active_loans: i64,
    /// Active loans past their due date
    pub overdue_loans: i64,
}

/// Liveness probe; does not touch the database
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<crate::AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: state.config.database.path.clone(),
    })
}

/// Readiness probe: round-trips to the store and reports its counters
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = ReadinessResponse),
        (status = 500, description = "Database unreachable")
    )
)]
pub async fn readiness_check(State(state): State<crate::AppState>) -> AppResult<Json<ReadinessResponse>> {
    let services = &state.services;
    services.repository.ping().await?;

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        books: services.catalog.count().await?,
        users: services.users.count().await?,
        active_loans: services.loans.count_active().await?,
        overdue_loans: services.loans.count_overdue().await?,
    }))
}
