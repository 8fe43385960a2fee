use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::applied_shares::AppliedShareStatus;
use crate::entities::{applied_share_errors, applied_shares};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedShareResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub company_share_id: i64,
    pub company_name: String,
    pub scrip: String,
    pub applied_kitta: i32,
    pub share_group_name: String,
    pub share_type_name: String,
    pub sub_group: String,
    pub status: AppliedShareStatus,
    pub created_at: DateTime<Utc>,
}

impl From<applied_shares::Model> for AppliedShareResponse {
    fn from(model: applied_shares::Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            company_share_id: model.company_share_id,
            company_name: model.company_name,
            scrip: model.scrip,
            applied_kitta: model.applied_kitta,
            share_group_name: model.share_group_name,
            share_type_name: model.share_type_name,
            sub_group: model.sub_group,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedSharesListResponse {
    pub status: String,
    pub applied_shares: Vec<AppliedShareResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedShareErrorResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub applied_share_id: Uuid,
    pub message: String,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl From<applied_share_errors::Model> for AppliedShareErrorResponse {
    fn from(model: applied_share_errors::Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            applied_share_id: model.applied_share_id,
            message: model.message,
            seen: model.seen,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedShareErrorsListResponse {
    pub status: String,
    pub applied_share_errors: Vec<AppliedShareErrorResponse>,
}

/// One attempt with the error it produced, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedShareDetailResponse {
    pub status: String,
    pub applied_share: AppliedShareResponse,
    pub applied_share_error: Option<AppliedShareErrorResponse>,
}
