//! Topic routes: filtered listing, status counts, moderation and the
//! records attached to a topic.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::models::answer::{TopicAnswer, UpdateAnswer};
use crate::models::audit::{AuditLogFilters, TopicAuditLog};
use crate::models::criteria::Criteria;
use crate::models::message::Message;
use crate::models::message_group::MessageGroup;
use crate::models::pagination::{PaginationQuery, PaginationResult};
use crate::models::topic::{StatusUpdate, Topic, TopicStatus};
use crate::services::listing::{StatusCounts, StatusPartition, TotalScope};
use crate::services::topic as topic_service;
use crate::AppState;

type TopicCriteria = Criteria<TopicStatus>;

/// GET /api/v1/topics: filtered page of topics.
pub async fn list(
    State(state): State<AppState>,
    pagination: Result<Query<PaginationQuery>, QueryRejection>,
    criteria: Result<Query<TopicCriteria>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginationResult<Topic>>>, AppError> {
    let Query(pagination) = pagination?;
    let Query(criteria) = criteria?;
    let page = state
        .topics
        .list_page(&criteria, &pagination.into_request())
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/v1/topics/count: per-status counts plus `total`.
pub async fn count(
    State(state): State<AppState>,
    criteria: Result<Query<TopicCriteria>, QueryRejection>,
) -> Result<Json<ApiResponse<StatusCounts>>, AppError> {
    let Query(criteria) = criteria?;
    let counts = count_topics(&state, &criteria).await?;
    Ok(ApiResponse::success(counts))
}

/// One partition per status; `in_statuses`, when given, scopes the total.
async fn count_topics(
    state: &AppState,
    criteria: &TopicCriteria,
) -> Result<StatusCounts, AppError> {
    let scope = match criteria.status_in.as_deref() {
        Some(statuses) if !statuses.is_empty() => TotalScope::Statuses(statuses.to_vec()),
        _ => TotalScope::Union,
    };
    state
        .topics
        .count_by_status_partitions(criteria, &StatusPartition::per_status(), &scope)
        .await
}

/// GET /api/v1/topics/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Topic>>, AppError> {
    let topic = state.topics.find_by_id(&id).await?;
    Ok(ApiResponse::success(topic))
}

/// PUT /api/v1/topics/{id}/status: explicit status change. Approvals and
/// rejections are audited like their dedicated routes.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdate<TopicStatus>>, JsonRejection>,
) -> Result<Json<ApiResponse<Topic>>, AppError> {
    let Json(body) = body?;
    let (topics, records) = (&state.topics, &state.records);
    let actor = &state.config.backoffice_actor;
    let topic = match body.status {
        TopicStatus::Approved => topic_service::approve(topics, records, actor, &id).await?,
        TopicStatus::Rejected => topic_service::reject(topics, records, actor, &id).await?,
        status => topics.update_status(&id, status).await?,
    };
    Ok(ApiResponse::success(topic))
}

/// PATCH /api/v1/topics/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Topic>>, AppError> {
    let topic = topic_service::approve(
        &state.topics,
        &state.records,
        &state.config.backoffice_actor,
        &id,
    )
    .await?;
    Ok(ApiResponse::success(topic))
}

/// PATCH /api/v1/topics/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Topic>>, AppError> {
    let topic = topic_service::reject(
        &state.topics,
        &state.records,
        &state.config.backoffice_actor,
        &id,
    )
    .await?;
    Ok(ApiResponse::success(topic))
}

/// GET /api/v1/topics/{id}/message-group: message groups under a topic.
pub async fn message_groups(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MessageGroup>>>, AppError> {
    let topic = state.topics.find_by_id(&id).await?;
    let groups = state.message_groups.list_by_parent(&topic.id).await?;
    Ok(ApiResponse::success(groups))
}

/// GET /api/v1/topics/{id}/messages
pub async fn messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let topic = state.topics.find_by_id(&id).await?;
    Ok(ApiResponse::success(state.records.messages_for_topic(&topic.id)))
}

/// GET /api/v1/topics/{id}/answer: `data` is null while unanswered.
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Option<TopicAnswer>>>, AppError> {
    let topic = state.topics.find_by_id(&id).await?;
    Ok(ApiResponse::success(state.records.answer_for_topic(&topic.id)))
}

/// PUT /api/v1/topics/{id}/answer
pub async fn update_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateAnswer>, JsonRejection>,
) -> Result<Json<ApiResponse<TopicAnswer>>, AppError> {
    let Json(body) = body?;
    let answer = topic_service::update_answer(
        &state.topics,
        &state.records,
        &state.config.backoffice_actor,
        &id,
        body,
    )
    .await?;
    Ok(ApiResponse::success(answer))
}

/// GET /api/v1/topics/{id}/audit-logs?types=APPROVED,REJECTED
pub async fn audit_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    filters: Result<Query<AuditLogFilters>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<TopicAuditLog>>>, AppError> {
    let Query(filters) = filters?;
    let topic = state.topics.find_by_id(&id).await?;
    let logs = state
        .records
        .audit_logs(&topic.id, filters.types.as_deref())
        .await;
    Ok(ApiResponse::success(logs))
}
