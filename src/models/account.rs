use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::accounts::{self, AccountStatus};

/// Smallest quantity the platform accepts for a primary issue.
pub const MIN_PREFERRED_KITTA: u16 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub client_id: u16,
    pub username: String,
    pub password: String,
    pub bank_id: String,
    pub crn_number: String,
    pub transaction_pin: String,
    pub preferred_kitta: u16,
}

impl CreateAccountRequest {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("username", &self.username),
            ("password", &self.password),
            ("bank_id", &self.bank_id),
            ("crn_number", &self.crn_number),
            ("transaction_pin", &self.transaction_pin),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(format!("{} is required", field));
        }
        if !self.bank_id.chars().all(|c| c.is_ascii_digit()) {
            return Err("bank_id must be numeric".to_string());
        }
        if self.preferred_kitta < MIN_PREFERRED_KITTA {
            return Err(format!(
                "preferred_kitta must be at least {}",
                MIN_PREFERRED_KITTA
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub message: String,
    pub account_id: Uuid,
}

/// Manual update of the fields a user controls. Applying it puts the account
/// back to `active`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub preferred_kitta: Option<u16>,
    pub transaction_pin: Option<String>,
    pub crn_number: Option<String>,
    pub password: Option<String>,
}

impl UpdateAccountRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(kitta) = self.preferred_kitta {
            if kitta < MIN_PREFERRED_KITTA {
                return Err(format!(
                    "preferred_kitta must be at least {}",
                    MIN_PREFERRED_KITTA
                ));
            }
        }
        for (field, value) in [
            ("transaction_pin", &self.transaction_pin),
            ("crn_number", &self.crn_number),
            ("password", &self.password),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{} must not be empty", field));
            }
        }
        Ok(())
    }
}

/// Account as shown to its owner. Credentials never leave the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub client_id: i32,
    pub username: String,
    pub bank_id: String,
    pub preferred_kitta: i32,
    pub demat: String,
    pub boid: String,
    pub dmat_expiry_date: String,
    pub expired_date: DateTime<Utc>,
    pub password_expiry_date: DateTime<Utc>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            contact: model.contact,
            client_id: model.client_id,
            username: model.username,
            bank_id: model.bank_id,
            preferred_kitta: model.preferred_kitta,
            demat: model.demat,
            boid: model.boid,
            dmat_expiry_date: model.dmat_expiry_date,
            expired_date: model.expired_date,
            password_expiry_date: model.password_expiry_date,
            status: model.status,
            created_at: model.created_at,
        }
    }
}
