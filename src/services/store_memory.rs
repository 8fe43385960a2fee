//! In-process stores
//!
//! Same contract as the database stores, held behind `parking_lot` locks.
//! Used by the integration tests and for dry runs without Postgres.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::accounts::{self, AccountStatus};
use crate::entities::{applied_share_errors, applied_shares};
use crate::error::StoreError;
use crate::services::store::{AccountPreferences, AccountStore, ShareStore};

#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<Uuid, accounts::Model>>,
    applied_shares: RwLock<Vec<applied_shares::Model>>,
    applied_share_errors: RwLock<Vec<applied_share_errors::Model>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every applied share row, in insertion order.
    pub fn applied_shares(&self) -> Vec<applied_shares::Model> {
        self.applied_shares.read().clone()
    }

    /// Every applied share error row, in insertion order.
    pub fn applied_share_errors(&self) -> Vec<applied_share_errors::Model> {
        self.applied_share_errors.read().clone()
    }

    /// Raw account row, including soft-deleted ones.
    pub fn account(&self, id: Uuid) -> Option<accounts::Model> {
        self.accounts.read().get(&id).cloned()
    }

    fn update_live<F>(&self, id: Uuid, apply: F) -> Result<accounts::Model, StoreError>
    where
        F: FnOnce(&mut accounts::Model),
    {
        let mut accounts = self.accounts.write();
        let account = accounts
            .get_mut(&id)
            .filter(|a| a.deleted_at.is_none())
            .ok_or(StoreError::NotFound)?;
        apply(account);
        account.updated_at = Utc::now();
        Ok(account.clone())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, account: accounts::Model) -> Result<Uuid, StoreError> {
        let mut accounts = self.accounts.write();
        if accounts
            .values()
            .any(|a| a.deleted_at.is_none() && a.username == account.username)
        {
            return Err(StoreError::Duplicate(format!(
                "username {} already linked",
                account.username
            )));
        }
        let id = account.id;
        accounts.insert(id, account);
        Ok(id)
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<accounts::Model>, StoreError> {
        Ok(self
            .accounts
            .read()
            .get(&id)
            .filter(|a| a.deleted_at.is_none())
            .cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<accounts::Model>, StoreError> {
        let mut accounts: Vec<_> = self
            .accounts
            .read()
            .values()
            .filter(|a| a.deleted_at.is_none())
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    async fn list_accounts_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<accounts::Model>, StoreError> {
        let mut accounts = self.list_accounts().await?;
        accounts.retain(|a| a.user_id == user_id);
        Ok(accounts)
    }

    async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> Result<(), StoreError> {
        self.update_live(id, |account| account.status = status)?;
        Ok(())
    }

    async fn update_preferences(
        &self,
        id: Uuid,
        preferences: AccountPreferences,
    ) -> Result<accounts::Model, StoreError> {
        self.update_live(id, |account| {
            if let Some(kitta) = preferences.preferred_kitta {
                account.preferred_kitta = kitta;
            }
            if let Some(pin) = preferences.transaction_pin {
                account.transaction_pin = pin;
            }
            if let Some(crn) = preferences.crn_number {
                account.crn_number = crn;
            }
            if let Some(password) = preferences.password {
                account.password = password;
            }
            account.status = AccountStatus::Active;
        })
    }

    async fn delete_account(&self, id: Uuid) -> Result<(), StoreError> {
        self.update_live(id, |account| account.deleted_at = Some(Utc::now()))?;
        Ok(())
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn insert_applied_share(
        &self,
        share: applied_shares::Model,
    ) -> Result<applied_shares::Model, StoreError> {
        let mut shares = self.applied_shares.write();
        if shares
            .iter()
            .any(|s| s.account_id == share.account_id && s.company_share_id == share.company_share_id)
        {
            return Err(StoreError::Duplicate(format!(
                "issue {} already attempted for account {}",
                share.company_share_id, share.account_id
            )));
        }
        shares.push(share.clone());
        Ok(share)
    }

    async fn insert_applied_share_error(
        &self,
        error: applied_share_errors::Model,
    ) -> Result<applied_share_errors::Model, StoreError> {
        let mut errors = self.applied_share_errors.write();
        if errors
            .iter()
            .any(|e| e.applied_share_id == error.applied_share_id)
        {
            return Err(StoreError::Duplicate(format!(
                "error already recorded for applied share {}",
                error.applied_share_id
            )));
        }
        errors.push(error.clone());
        Ok(error)
    }

    async fn get_applied_share(
        &self,
        id: Uuid,
    ) -> Result<Option<applied_shares::Model>, StoreError> {
        Ok(self
            .applied_shares
            .read()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_applied_share(
        &self,
        account_id: Uuid,
        company_share_id: i64,
    ) -> Result<Option<applied_shares::Model>, StoreError> {
        Ok(self
            .applied_shares
            .read()
            .iter()
            .find(|s| s.account_id == account_id && s.company_share_id == company_share_id)
            .cloned())
    }

    async fn list_applied_shares_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<applied_shares::Model>, StoreError> {
        Ok(self
            .applied_shares
            .read()
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_applied_share_errors_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<applied_share_errors::Model>, StoreError> {
        Ok(self
            .applied_share_errors
            .read()
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_error_by_applied_share(
        &self,
        applied_share_id: Uuid,
    ) -> Result<Option<applied_share_errors::Model>, StoreError> {
        Ok(self
            .applied_share_errors
            .read()
            .iter()
            .find(|e| e.applied_share_id == applied_share_id)
            .cloned())
    }

    async fn mark_errors_seen_by_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut flipped = 0;
        for error in self
            .applied_share_errors
            .write()
            .iter_mut()
            .filter(|e| e.user_id == user_id && !e.seen)
        {
            error.seen = true;
            flipped += 1;
        }
        Ok(flipped)
    }
}
