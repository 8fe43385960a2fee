//! Daily share application run
//!
//! Walks every live account once, deactivates the ones that can no longer
//! apply, and submits an application for each open ordinary-share issue the
//! account has not attempted yet. Nothing that happens to a single account or
//! issue stops the run; failures end up as rows the owner can read later.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::accounts::{self, AccountStatus};
use crate::entities::applied_shares::{self, AppliedShareStatus};
use crate::entities::applied_share_errors;
use crate::error::{PlatformError, StoreError};
use crate::models::meroshare::{ApplicableIssue, ApplyShareRequest};
use crate::services::eligibility::{self, Eligibility};
use crate::services::meroshare::{ApplyOutcome, AuthToken, MeroShareClient};
use crate::services::store::{AccountStore, ShareStore};

pub const ORDINARY_SHARE_GROUP: &str = "Ordinary Shares";

/// Counters for one run, logged when it finishes and kept in `sync_status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub accounts: usize,
    pub skipped: usize,
    pub deactivated: usize,
    pub login_failures: usize,
    pub applied: usize,
    pub failed: usize,
    pub in_process: usize,
    /// Store or platform errors that cut an account's or issue's work short.
    pub errors: usize,
}

#[derive(Clone)]
pub struct ShareApplyService {
    meroshare: MeroShareClient,
    accounts: Arc<dyn AccountStore>,
    shares: Arc<dyn ShareStore>,
}

impl ShareApplyService {
    pub fn new(
        meroshare: MeroShareClient,
        accounts: Arc<dyn AccountStore>,
        shares: Arc<dyn ShareStore>,
    ) -> Self {
        Self {
            meroshare,
            accounts,
            shares,
        }
    }

    pub async fn run(&self) -> Result<BatchSummary, StoreError> {
        self.run_at(Utc::now()).await
    }

    /// Only a failure to list accounts aborts the run.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<BatchSummary, StoreError> {
        let accounts = self.accounts.list_accounts().await?;
        tracing::info!("Starting share application run for {} accounts", accounts.len());

        let mut summary = BatchSummary {
            accounts: accounts.len(),
            ..Default::default()
        };

        for account in &accounts {
            self.process_account(account, now, &mut summary).await;
        }

        tracing::info!(
            accounts = summary.accounts,
            applied = summary.applied,
            failed = summary.failed,
            deactivated = summary.deactivated,
            "Share application run finished"
        );
        Ok(summary)
    }

    async fn process_account(
        &self,
        account: &accounts::Model,
        now: DateTime<Utc>,
        summary: &mut BatchSummary,
    ) {
        match eligibility::classify(account, now) {
            Eligibility::Eligible => {}
            Eligibility::Skip => {
                summary.skipped += 1;
                return;
            }
            Eligibility::Deactivate(status) => {
                tracing::info!(account_id = %account.id, %status, "Deactivating account");
                if self.set_status(account.id, status, summary).await {
                    summary.deactivated += 1;
                }
                return;
            }
        }

        let client_id = match u16::try_from(account.client_id) {
            Ok(id) => id,
            Err(_) => {
                tracing::error!(account_id = %account.id, client_id = account.client_id, "Stored client id out of range");
                summary.errors += 1;
                return;
            }
        };

        let token = match self
            .meroshare
            .login(client_id, &account.username, &account.password)
            .await
        {
            Ok(token) => token,
            Err(e) if e.is_invalid_credentials() => {
                tracing::warn!(account_id = %account.id, "MeroShare rejected stored credentials");
                summary.login_failures += 1;
                if self
                    .set_status(account.id, AccountStatus::InvalidCredentials, summary)
                    .await
                {
                    summary.deactivated += 1;
                }
                return;
            }
            Err(e) => {
                tracing::warn!(account_id = %account.id, error = %e, "MeroShare login failed, retrying next run");
                summary.login_failures += 1;
                return;
            }
        };

        let issues = match self.meroshare.fetch_applicable_issues(&token).await {
            Ok(issues) => issues,
            Err(e) => {
                tracing::error!(account_id = %account.id, error = %e, "Failed to fetch applicable issues");
                summary.errors += 1;
                return;
            }
        };

        for issue in issues.iter().filter(|issue| is_applicable(issue)) {
            match self
                .shares
                .find_applied_share(account.id, issue.company_share_id)
                .await
            {
                Ok(Some(_)) => {
                    tracing::debug!(
                        account_id = %account.id,
                        company_share_id = issue.company_share_id,
                        "Issue already attempted"
                    );
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        account_id = %account.id,
                        company_share_id = issue.company_share_id,
                        error = %e,
                        "Dedup lookup failed, skipping issue"
                    );
                    summary.errors += 1;
                    continue;
                }
            }

            self.apply_for_issue(account, issue, &token, now, summary)
                .await;
        }
    }

    async fn apply_for_issue(
        &self,
        account: &accounts::Model,
        issue: &ApplicableIssue,
        token: &AuthToken,
        now: DateTime<Utc>,
        summary: &mut BatchSummary,
    ) {
        let request = apply_request(account, issue);

        match self.meroshare.apply(token, &request).await {
            Ok(ApplyOutcome::Applied(_)) => {
                tracing::info!(
                    account_id = %account.id,
                    company_share_id = issue.company_share_id,
                    scrip = %issue.scrip,
                    "Applied for share"
                );
                let row = applied_share_row(account, issue, AppliedShareStatus::Applied, now);
                match self.shares.insert_applied_share(row).await {
                    Ok(_) => summary.applied += 1,
                    Err(e) => {
                        tracing::error!(account_id = %account.id, error = %e, "Failed to record applied share");
                        summary.errors += 1;
                    }
                }
            }
            Ok(ApplyOutcome::InProcess) => {
                summary.in_process += 1;
            }
            Err(e) => {
                tracing::warn!(
                    account_id = %account.id,
                    company_share_id = issue.company_share_id,
                    error = %e,
                    "Share application failed"
                );
                if matches!(e, PlatformError::InvalidPin(_)) {
                    self.set_status(account.id, AccountStatus::InvalidPin, summary)
                        .await;
                }
                summary.failed += 1;
                self.record_failure(account, issue, &e, now, summary).await;
            }
        }
    }

    async fn record_failure(
        &self,
        account: &accounts::Model,
        issue: &ApplicableIssue,
        error: &PlatformError,
        now: DateTime<Utc>,
        summary: &mut BatchSummary,
    ) {
        let row = applied_share_row(account, issue, AppliedShareStatus::Failed, now);
        let applied_share = match self.shares.insert_applied_share(row).await {
            Ok(share) => share,
            Err(e) => {
                tracing::error!(account_id = %account.id, error = %e, "Failed to record failed share");
                summary.errors += 1;
                return;
            }
        };

        let error_row = applied_share_errors::Model {
            id: Uuid::new_v4(),
            user_id: account.user_id,
            account_id: account.id,
            applied_share_id: applied_share.id,
            message: error.to_string(),
            seen: false,
            created_at: now,
        };
        if let Err(e) = self.shares.insert_applied_share_error(error_row).await {
            tracing::error!(account_id = %account.id, error = %e, "Failed to record share error");
            summary.errors += 1;
        }
    }

    /// Returns whether the new status was stored.
    async fn set_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
        summary: &mut BatchSummary,
    ) -> bool {
        match self.accounts.set_account_status(account_id, status).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(%account_id, %status, error = %e, "Failed to update account status");
                summary.errors += 1;
                false
            }
        }
    }
}

/// Open ordinary-share issue with no action pending on the platform.
pub fn is_applicable(issue: &ApplicableIssue) -> bool {
    issue.action.is_empty() && issue.share_group_name == ORDINARY_SHARE_GROUP
}

fn apply_request(account: &accounts::Model, issue: &ApplicableIssue) -> ApplyShareRequest {
    ApplyShareRequest {
        demat: account.demat.clone(),
        boid: account.boid.clone(),
        account_number: account.account_number.clone(),
        customer_id: account.customer_id,
        account_branch_id: account.account_branch_id,
        account_type_id: account.account_type_id,
        applied_kitta: account.preferred_kitta.to_string(),
        crn_number: account.crn_number.clone(),
        transaction_pin: account.transaction_pin.clone(),
        company_share_id: issue.company_share_id.to_string(),
        bank_id: account.bank_id.clone(),
    }
}

fn applied_share_row(
    account: &accounts::Model,
    issue: &ApplicableIssue,
    status: AppliedShareStatus,
    now: DateTime<Utc>,
) -> applied_shares::Model {
    applied_shares::Model {
        id: Uuid::new_v4(),
        user_id: account.user_id,
        account_id: account.id,
        company_share_id: issue.company_share_id,
        company_name: issue.company_name.clone(),
        scrip: issue.scrip.clone(),
        applied_kitta: account.preferred_kitta,
        share_group_name: issue.share_group_name.clone(),
        share_type_name: issue.share_type_name.clone(),
        sub_group: issue.sub_group.clone(),
        status,
        created_at: now,
    }
}
