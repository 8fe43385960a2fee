use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::accounts::{self, AccountStatus};
use crate::error::{LinkError, PlatformError};
use crate::models::account::CreateAccountRequest;
use crate::models::meroshare::{BankDetails, OwnDetails};
use crate::services::meroshare::MeroShareClient;
use crate::services::store::AccountStore;

/// Links a MeroShare login to a user: verifies the credentials, pulls the
/// identity and bank records the application form needs, and stores the
/// result as a new active account.
#[derive(Clone)]
pub struct AccountLinkingService {
    meroshare: MeroShareClient,
    accounts: Arc<dyn AccountStore>,
}

impl AccountLinkingService {
    pub fn new(meroshare: MeroShareClient, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            meroshare,
            accounts,
        }
    }

    pub async fn link_account(
        &self,
        user_id: Uuid,
        request: CreateAccountRequest,
    ) -> Result<Uuid, LinkError> {
        let token = self
            .meroshare
            .login(request.client_id, &request.username, &request.password)
            .await
            .map_err(|e| {
                tracing::info!(%user_id, error = %e, "MeroShare login failed while linking account");
                LinkError::Unauthenticated
            })?;

        // Both fetches run to completion; the first error is the one reported
        let own_details_task = {
            let client = self.meroshare.clone();
            let token = token.clone();
            tokio::spawn(async move { client.fetch_own_details(&token).await })
        };
        let bank_details_task = {
            let client = self.meroshare.clone();
            let token = token.clone();
            let bank_id = request.bank_id.clone();
            tokio::spawn(async move { client.fetch_bank_details(&token, &bank_id).await })
        };

        let (own_details, bank_details) = tokio::try_join!(
            join_fetch(own_details_task),
            join_fetch(bank_details_task)
        )?;

        let bank = bank_details
            .into_iter()
            .next()
            .ok_or(LinkError::NoBankRecord)?;

        let account = build_account(user_id, request, own_details, bank);
        let account_id = self.accounts.create_account(account).await?;

        tracing::info!(%user_id, %account_id, "Linked MeroShare account");
        Ok(account_id)
    }
}

async fn join_fetch<T>(
    task: tokio::task::JoinHandle<Result<T, PlatformError>>,
) -> Result<T, LinkError> {
    match task.await {
        Ok(result) => Ok(result?),
        Err(e) => Err(LinkError::Task(e.to_string())),
    }
}

fn build_account(
    user_id: Uuid,
    request: CreateAccountRequest,
    own: OwnDetails,
    bank: BankDetails,
) -> accounts::Model {
    let now = Utc::now();

    accounts::Model {
        id: Uuid::new_v4(),
        user_id,
        name: own.name,
        email: own.email,
        contact: own.contact,
        client_id: i32::from(request.client_id),
        username: request.username,
        password: request.password,
        bank_id: request.bank_id,
        crn_number: request.crn_number,
        transaction_pin: request.transaction_pin,
        account_type_id: bank.account_type_id,
        preferred_kitta: i32::from(request.preferred_kitta),
        demat: own.demat,
        boid: own.boid,
        account_number: bank.account_number,
        customer_id: bank.id,
        account_branch_id: bank.account_branch_id,
        dmat_expiry_date: own.demat_expiry_date,
        expired_date: own.expired_date,
        password_expiry_date: own.password_expiry_date,
        status: AccountStatus::Active,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
