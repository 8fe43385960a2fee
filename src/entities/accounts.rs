//! `SeaORM` Entity for the accounts table
//!
//! Credentials are stored as opaque strings and must never reach a log line
//! or an API response; see `models::account::AccountResponse` for the
//! redacted view.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a linked account. Anything other than `Active` is terminal
/// for the share application job; only a manual preferences update moves an
/// account back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "meroshare_expired")]
    MeroshareExpired,
    #[sea_orm(string_value = "password_expired")]
    PasswordExpired,
    #[sea_orm(string_value = "dmat_expired")]
    DmatExpired,
    #[sea_orm(string_value = "invalid_credentials")]
    InvalidCredentials,
    #[sea_orm(string_value = "invalid_pin")]
    InvalidPin,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::MeroshareExpired => "meroshare_expired",
            AccountStatus::PasswordExpired => "password_expired",
            AccountStatus::DmatExpired => "dmat_expired",
            AccountStatus::InvalidCredentials => "invalid_credentials",
            AccountStatus::InvalidPin => "invalid_pin",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub client_id: i32,
    /// Unique among accounts that are not soft-deleted
    pub username: String,
    pub password: String,
    pub bank_id: String,
    pub crn_number: String,
    pub transaction_pin: String,
    pub account_type_id: i32,
    pub preferred_kitta: i32,
    pub demat: String,
    pub boid: String,
    pub account_number: String,
    pub customer_id: i64,
    pub account_branch_id: i64,
    /// Bikram Sambat date string, `YYYY-MM-DD`
    pub dmat_expiry_date: String,
    pub expired_date: DateTimeUtc,
    pub password_expiry_date: DateTimeUtc,
    pub status: AccountStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::applied_shares::Entity")]
    AppliedShares,
}

impl Related<super::applied_shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppliedShares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
