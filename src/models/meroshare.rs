//! Request and response shapes of the MeroShare web backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub client_id: String,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnDetails {
    #[serde(default)]
    pub boid: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub demat: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Bikram Sambat, `YYYY-MM-DD`
    pub demat_expiry_date: String,
    pub password_expiry_date: DateTime<Utc>,
    pub expired_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_branch_id: i64,
    pub account_number: String,
    pub account_type_id: i32,
    #[serde(default)]
    pub account_type_name: String,
    #[serde(default)]
    pub branch_name: String,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicableIssue {
    pub company_share_id: i64,
    #[serde(default)]
    pub sub_group: String,
    #[serde(default)]
    pub scrip: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub share_type_name: String,
    #[serde(default)]
    pub share_group_name: String,
    #[serde(default)]
    pub status_name: String,
    /// Non-empty when the platform already holds an action for this issue
    /// (e.g. `inProcess`, `edit`).
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub issue_open_date: String,
    #[serde(default)]
    pub issue_close_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicableIssuesResponse {
    #[serde(rename = "object", default)]
    pub issues: Vec<ApplicableIssue>,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyShareRequest {
    pub demat: String,
    pub boid: String,
    pub account_number: String,
    pub customer_id: i64,
    pub account_branch_id: i64,
    pub account_type_id: i32,
    pub applied_kitta: String,
    pub crn_number: String,
    #[serde(rename = "transactionPIN")]
    pub transaction_pin: String,
    pub company_share_id: String,
    pub bank_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConflictBody {
    pub message: String,
}
