use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::accounts::{self, AccountStatus};
use crate::entities::{applied_share_errors, applied_shares, prelude::*};
use crate::error::StoreError;
use crate::services::store::{AccountPreferences, AccountStore, ShareStore};

/// Postgres-backed stores.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn live_account(&self, id: Uuid) -> Result<accounts::Model, StoreError> {
        Accounts::find_by_id(id)
            .filter(accounts::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await?
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl AccountStore for SeaOrmStore {
    async fn create_account(&self, account: accounts::Model) -> Result<Uuid, StoreError> {
        let new_account = accounts::ActiveModel {
            id: Set(account.id),
            user_id: Set(account.user_id),
            name: Set(account.name),
            email: Set(account.email),
            contact: Set(account.contact),
            client_id: Set(account.client_id),
            username: Set(account.username),
            password: Set(account.password),
            bank_id: Set(account.bank_id),
            crn_number: Set(account.crn_number),
            transaction_pin: Set(account.transaction_pin),
            account_type_id: Set(account.account_type_id),
            preferred_kitta: Set(account.preferred_kitta),
            demat: Set(account.demat),
            boid: Set(account.boid),
            account_number: Set(account.account_number),
            customer_id: Set(account.customer_id),
            account_branch_id: Set(account.account_branch_id),
            dmat_expiry_date: Set(account.dmat_expiry_date),
            expired_date: Set(account.expired_date),
            password_expiry_date: Set(account.password_expiry_date),
            status: Set(account.status),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
            deleted_at: Set(account.deleted_at),
        };

        let inserted = new_account.insert(self.db.as_ref()).await?;
        Ok(inserted.id)
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<accounts::Model>, StoreError> {
        Ok(Accounts::find_by_id(id)
            .filter(accounts::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await?)
    }

    async fn list_accounts(&self) -> Result<Vec<accounts::Model>, StoreError> {
        Ok(Accounts::find()
            .filter(accounts::Column::DeletedAt.is_null())
            .order_by(accounts::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await?)
    }

    async fn list_accounts_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<accounts::Model>, StoreError> {
        Ok(Accounts::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::DeletedAt.is_null())
            .order_by(accounts::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await?)
    }

    async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> Result<(), StoreError> {
        let mut active_model = self.live_account(id).await?.into_active_model();
        active_model.status = Set(status);
        active_model.updated_at = Set(Utc::now());
        active_model.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn update_preferences(
        &self,
        id: Uuid,
        preferences: AccountPreferences,
    ) -> Result<accounts::Model, StoreError> {
        let mut active_model = self.live_account(id).await?.into_active_model();
        if let Some(kitta) = preferences.preferred_kitta {
            active_model.preferred_kitta = Set(kitta);
        }
        if let Some(pin) = preferences.transaction_pin {
            active_model.transaction_pin = Set(pin);
        }
        if let Some(crn) = preferences.crn_number {
            active_model.crn_number = Set(crn);
        }
        if let Some(password) = preferences.password {
            active_model.password = Set(password);
        }
        active_model.status = Set(AccountStatus::Active);
        active_model.updated_at = Set(Utc::now());

        Ok(active_model.update(self.db.as_ref()).await?)
    }

    async fn delete_account(&self, id: Uuid) -> Result<(), StoreError> {
        let mut active_model = self.live_account(id).await?.into_active_model();
        let now = Utc::now();
        active_model.deleted_at = Set(Some(now));
        active_model.updated_at = Set(now);
        active_model.update(self.db.as_ref()).await?;
        Ok(())
    }
}

#[async_trait]
impl ShareStore for SeaOrmStore {
    async fn insert_applied_share(
        &self,
        share: applied_shares::Model,
    ) -> Result<applied_shares::Model, StoreError> {
        let new_share = applied_shares::ActiveModel {
            id: Set(share.id),
            user_id: Set(share.user_id),
            account_id: Set(share.account_id),
            company_share_id: Set(share.company_share_id),
            company_name: Set(share.company_name),
            scrip: Set(share.scrip),
            applied_kitta: Set(share.applied_kitta),
            share_group_name: Set(share.share_group_name),
            share_type_name: Set(share.share_type_name),
            sub_group: Set(share.sub_group),
            status: Set(share.status),
            created_at: Set(share.created_at),
        };

        Ok(new_share.insert(self.db.as_ref()).await?)
    }

    async fn insert_applied_share_error(
        &self,
        error: applied_share_errors::Model,
    ) -> Result<applied_share_errors::Model, StoreError> {
        let new_error = applied_share_errors::ActiveModel {
            id: Set(error.id),
            user_id: Set(error.user_id),
            account_id: Set(error.account_id),
            applied_share_id: Set(error.applied_share_id),
            message: Set(error.message),
            seen: Set(error.seen),
            created_at: Set(error.created_at),
        };

        Ok(new_error.insert(self.db.as_ref()).await?)
    }

    async fn get_applied_share(
        &self,
        id: Uuid,
    ) -> Result<Option<applied_shares::Model>, StoreError> {
        Ok(AppliedShares::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn find_applied_share(
        &self,
        account_id: Uuid,
        company_share_id: i64,
    ) -> Result<Option<applied_shares::Model>, StoreError> {
        Ok(AppliedShares::find()
            .filter(applied_shares::Column::AccountId.eq(account_id))
            .filter(applied_shares::Column::CompanyShareId.eq(company_share_id))
            .one(self.db.as_ref())
            .await?)
    }

    async fn list_applied_shares_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<applied_shares::Model>, StoreError> {
        Ok(AppliedShares::find()
            .filter(applied_shares::Column::UserId.eq(user_id))
            .order_by(applied_shares::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await?)
    }

    async fn list_applied_share_errors_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<applied_share_errors::Model>, StoreError> {
        Ok(AppliedShareErrors::find()
            .filter(applied_share_errors::Column::UserId.eq(user_id))
            .order_by(applied_share_errors::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find_error_by_applied_share(
        &self,
        applied_share_id: Uuid,
    ) -> Result<Option<applied_share_errors::Model>, StoreError> {
        Ok(AppliedShareErrors::find()
            .filter(applied_share_errors::Column::AppliedShareId.eq(applied_share_id))
            .one(self.db.as_ref())
            .await?)
    }

    async fn mark_errors_seen_by_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = AppliedShareErrors::update_many()
            .col_expr(applied_share_errors::Column::Seen, Expr::value(true))
            .filter(applied_share_errors::Column::UserId.eq(user_id))
            .filter(applied_share_errors::Column::Seen.eq(false))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }
}
