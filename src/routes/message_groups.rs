//! Message group routes.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::models::criteria::Criteria;
use crate::models::message_group::{MessageGroup, MessageGroupStatus};
use crate::models::pagination::{PaginationQuery, PaginationResult};
use crate::models::topic::StatusUpdate;
use crate::services::listing::{StatusCounts, StatusPartition, TotalScope};
use crate::AppState;

type GroupCriteria = Criteria<MessageGroupStatus>;

/// GET /api/v1/message-groups
pub async fn list(
    State(state): State<AppState>,
    pagination: Result<Query<PaginationQuery>, QueryRejection>,
    criteria: Result<Query<GroupCriteria>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginationResult<MessageGroup>>>, AppError> {
    let Query(pagination) = pagination?;
    let Query(criteria) = criteria?;
    let page = state
        .message_groups
        .list_page(&criteria, &pagination.into_request())
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/v1/message-groups/count
pub async fn count(
    State(state): State<AppState>,
    criteria: Result<Query<GroupCriteria>, QueryRejection>,
) -> Result<Json<ApiResponse<StatusCounts>>, AppError> {
    let Query(criteria) = criteria?;
    let scope = match criteria.status_in.as_deref() {
        Some(statuses) if !statuses.is_empty() => TotalScope::Statuses(statuses.to_vec()),
        _ => TotalScope::Union,
    };
    let counts = state
        .message_groups
        .count_by_status_partitions(&criteria, &StatusPartition::per_status(), &scope)
        .await?;
    Ok(ApiResponse::success(counts))
}

/// GET /api/v1/message-groups/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageGroup>>, AppError> {
    let group = state.message_groups.find_by_id(&id).await?;
    Ok(ApiResponse::success(group))
}

/// PUT /api/v1/message-groups/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdate<MessageGroupStatus>>, JsonRejection>,
) -> Result<Json<ApiResponse<MessageGroup>>, AppError> {
    let Json(body) = body?;
    let group = state.message_groups.update_status(&id, body.status).await?;
    Ok(ApiResponse::success(group))
}
