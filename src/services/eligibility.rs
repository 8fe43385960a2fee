//! Decides whether an account may take part in today's application run.

use chrono::{DateTime, Utc};

use crate::entities::accounts::{self, AccountStatus};
use crate::services::calendar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// Leave the account untouched this run.
    Skip,
    /// Move the account to a terminal status and stop.
    Deactivate(AccountStatus),
}

/// Checks run in a fixed order: platform login expiry, then password expiry,
/// then DMAT expiry. The first one that fails decides the outcome.
pub fn classify(account: &accounts::Model, now: DateTime<Utc>) -> Eligibility {
    if account.status != AccountStatus::Active {
        return Eligibility::Skip;
    }

    if account.expired_date < now {
        return Eligibility::Deactivate(AccountStatus::MeroshareExpired);
    }

    if account.password_expiry_date < now {
        return Eligibility::Deactivate(AccountStatus::PasswordExpired);
    }

    let dmat_expiry = match calendar::bs_str_to_ad(&account.dmat_expiry_date) {
        Ok(date) => date,
        Err(e) => {
            tracing::warn!(
                account_id = %account.id,
                error = %e,
                "Could not convert DMAT expiry date, skipping account"
            );
            return Eligibility::Skip;
        }
    };

    if dmat_expiry.and_time(chrono::NaiveTime::MIN).and_utc() < now {
        return Eligibility::Deactivate(AccountStatus::DmatExpired);
    }

    Eligibility::Eligible
}
