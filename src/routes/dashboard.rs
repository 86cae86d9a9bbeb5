//! Dashboard routes: aggregated statistics for the overview page.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

/// GET /api/v1/dashboard/stats: aggregated dashboard statistics.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = dashboard::get_stats(&state.topics, &state.message_groups, &state.records).await?;
    Ok(ApiResponse::success(stats))
}
