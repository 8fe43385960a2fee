//! Persistence seams for accounts and application attempts
//!
//! Every mutation is a single-row insert or a single-row update, so the
//! backing store's own row atomicity is all the batch needs. Implementations
//! must read their own writes: a dedup lookup right after an insert for the
//! same (account, issue) has to see that insert.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::accounts::{self, AccountStatus};
use crate::entities::{applied_share_errors, applied_shares};
use crate::error::StoreError;

/// Fields an owner may change by hand. Applying them re-activates the account.
#[derive(Debug, Clone, Default)]
pub struct AccountPreferences {
    pub preferred_kitta: Option<i32>,
    pub transaction_pin: Option<String>,
    pub crn_number: Option<String>,
    pub password: Option<String>,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_account(&self, account: accounts::Model) -> Result<Uuid, StoreError>;

    /// Soft-deleted accounts are not returned.
    async fn get_account(&self, id: Uuid) -> Result<Option<accounts::Model>, StoreError>;

    async fn list_accounts(&self) -> Result<Vec<accounts::Model>, StoreError>;

    async fn list_accounts_by_user(&self, user_id: Uuid)
    -> Result<Vec<accounts::Model>, StoreError>;

    async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> Result<(), StoreError>;

    async fn update_preferences(
        &self,
        id: Uuid,
        preferences: AccountPreferences,
    ) -> Result<accounts::Model, StoreError>;

    async fn delete_account(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ShareStore: Send + Sync {
    async fn insert_applied_share(
        &self,
        share: applied_shares::Model,
    ) -> Result<applied_shares::Model, StoreError>;

    async fn insert_applied_share_error(
        &self,
        error: applied_share_errors::Model,
    ) -> Result<applied_share_errors::Model, StoreError>;

    async fn get_applied_share(&self, id: Uuid)
    -> Result<Option<applied_shares::Model>, StoreError>;

    async fn find_applied_share(
        &self,
        account_id: Uuid,
        company_share_id: i64,
    ) -> Result<Option<applied_shares::Model>, StoreError>;

    async fn list_applied_shares_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<applied_shares::Model>, StoreError>;

    async fn list_applied_share_errors_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<applied_share_errors::Model>, StoreError>;

    /// A failed attempt has exactly one error row; others have none.
    async fn find_error_by_applied_share(
        &self,
        applied_share_id: Uuid,
    ) -> Result<Option<applied_share_errors::Model>, StoreError>;

    /// Returns the number of rows flipped to seen.
    async fn mark_errors_seen_by_user(&self, user_id: Uuid) -> Result<u64, StoreError>;
}
