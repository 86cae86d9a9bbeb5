//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::DataSourceConfig;
use crate::errors::ApiResponse;
use crate::models::criteria::Criteria;
use crate::AppState;

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub data_source: String,
    pub mode: String,
}

/// Liveness probe: always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe: checks that the topic source answers a count.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let data_source = match state.topics.count(&Criteria::default()).await {
        Ok(_) => "connected".to_string(),
        Err(e) if e.is_upstream() => {
            tracing::warn!(error = %e, "Remote data source unreachable");
            format!("unreachable: {e}")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Data source health check failed");
            format!("error: {e}")
        }
    };

    let mode = match &state.config.data_source {
        DataSourceConfig::Mock => "mock",
        DataSourceConfig::Remote { .. } => "remote",
    };

    ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        data_source,
        mode: mode.to_string(),
    })
}
