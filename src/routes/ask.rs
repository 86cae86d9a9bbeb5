//! End-user ask routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::models::answer::{AskAnswer, AskMessage};
use crate::AppState;

/// POST /api/v1/ask: look up or record a question.
pub async fn ask(
    State(state): State<AppState>,
    body: Result<Json<AskMessage>, JsonRejection>,
) -> Result<Json<ApiResponse<AskAnswer>>, AppError> {
    let Json(body) = body?;
    body.validate()?;
    Ok(ApiResponse::success(state.records.ask(body.message.trim())))
}

/// GET /api/v1/ask/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AskAnswer>>, AppError> {
    state
        .records
        .get_ask_answer(&id)
        .map(ApiResponse::success)
        .ok_or_else(|| AppError::NotFound(format!("Answer '{id}' not found")))
}
