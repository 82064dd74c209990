/*!
 * # Health Check Module
 *
 * `GET /health` reports whether the service is up and whether the product
 * datastore answers a ping.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::AppState;

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Health report returned by `/health`
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub database: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthInfo {
    fn from_database(database: HealthStatus) -> Self {
        Self {
            status: database,
            database,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Up => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Creates router with health check endpoints
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check with datastore verification
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and datastore are up", body = HealthInfo),
        (status = 503, description = "Datastore is unreachable", body = HealthInfo)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check endpoint called");

    let database = match crate::db::check_connection(&state.db).await {
        Ok(()) => HealthStatus::Up,
        Err(e) => {
            error!("Database health check failed: {}", e);
            HealthStatus::Down
        }
    };

    let health = HealthInfo::from_database(database);
    (health.status_code(), Json(health))
}
