use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use uuid::Uuid;

use super::require_user;
use crate::AppState;
use crate::error::ApiError;
use crate::models::common::MessageResponse;
use crate::models::share::{
    AppliedShareDetailResponse, AppliedShareErrorResponse, AppliedShareErrorsListResponse,
    AppliedShareResponse, AppliedSharesListResponse,
};

/// Every application attempt for the user's accounts, newest first.
pub async fn list_applied_shares(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AppliedSharesListResponse>, ApiError> {
    let user_id = require_user(&headers)?;

    let shares = state.shares.list_applied_shares_by_user(user_id).await?;

    Ok(Json(AppliedSharesListResponse {
        status: "success".to_string(),
        applied_shares: shares.into_iter().map(AppliedShareResponse::from).collect(),
    }))
}

/// Shares owned by another user answer 404, same as missing ones.
pub async fn get_applied_share(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<AppliedShareDetailResponse>, ApiError> {
    let user_id = require_user(&headers)?;

    let share = state
        .shares
        .get_applied_share(id)
        .await?
        .filter(|share| share.user_id == user_id)
        .ok_or_else(|| ApiError::NotFound("Applied share not found".to_string()))?;

    let error = state.shares.find_error_by_applied_share(share.id).await?;

    Ok(Json(AppliedShareDetailResponse {
        status: "success".to_string(),
        applied_share: share.into(),
        applied_share_error: error.map(AppliedShareErrorResponse::from),
    }))
}

pub async fn list_applied_share_errors(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AppliedShareErrorsListResponse>, ApiError> {
    let user_id = require_user(&headers)?;

    let errors = state.shares.list_applied_share_errors_by_user(user_id).await?;

    Ok(Json(AppliedShareErrorsListResponse {
        status: "success".to_string(),
        applied_share_errors: errors
            .into_iter()
            .map(AppliedShareErrorResponse::from)
            .collect(),
    }))
}

pub async fn mark_errors_seen(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = require_user(&headers)?;

    let updated = state.shares.mark_errors_seen_by_user(user_id).await?;
    tracing::debug!(%user_id, updated, "Marked share errors as seen");

    Ok(Json(MessageResponse {
        status: "success".to_string(),
        message: format!("{} errors marked as seen", updated),
    }))
}
