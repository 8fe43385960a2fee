use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use uuid::Uuid;

use super::require_user;
use crate::AppState;
use crate::entities::accounts;
use crate::error::ApiError;
use crate::models::account::{
    AccountResponse, CreateAccountRequest, CreateAccountResponse, UpdateAccountRequest,
};
use crate::models::common::MessageResponse;
use crate::services::store::AccountPreferences;

/// Link a MeroShare account to the calling user.
///
/// The credentials are checked against MeroShare before anything is stored.
pub async fn create_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, ApiError> {
    let user_id = require_user(&headers)?;
    payload.validate().map_err(ApiError::Validation)?;

    let account_id = state.linking.link_account(user_id, payload).await?;

    Ok(Json(CreateAccountResponse {
        message: "Account created successfully".to_string(),
        account_id,
    }))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let user_id = require_user(&headers)?;

    let accounts = state.accounts.list_accounts_by_user(user_id).await?;

    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

pub async fn get_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, ApiError> {
    let user_id = require_user(&headers)?;
    let account = owned_account(&state, user_id, id).await?;
    Ok(Json(account.into()))
}

/// Change preferred kitta, PIN, CRN or password. Puts the account back to `active`.
pub async fn update_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let user_id = require_user(&headers)?;
    payload.validate().map_err(ApiError::Validation)?;
    owned_account(&state, user_id, id).await?;

    let preferences = AccountPreferences {
        preferred_kitta: payload.preferred_kitta.map(i32::from),
        transaction_pin: payload.transaction_pin,
        crn_number: payload.crn_number,
        password: payload.password,
    };
    let updated = state.accounts.update_preferences(id, preferences).await?;

    tracing::info!(%user_id, account_id = %id, "Account preferences updated");
    Ok(Json(updated.into()))
}

pub async fn delete_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = require_user(&headers)?;
    owned_account(&state, user_id, id).await?;

    state.accounts.delete_account(id).await?;

    tracing::info!(%user_id, account_id = %id, "Account deleted");
    Ok(Json(MessageResponse {
        status: "success".to_string(),
        message: "Account deleted successfully".to_string(),
    }))
}

/// Accounts owned by someone else look exactly like missing ones.
async fn owned_account(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<accounts::Model, ApiError> {
    state
        .accounts
        .get_account(id)
        .await?
        .filter(|account| account.user_id == user_id)
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))
}
