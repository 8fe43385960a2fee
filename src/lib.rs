// src/lib.rs

use std::sync::Arc;

use services::account_linking::AccountLinkingService;
use services::store::{AccountStore, ShareStore};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub shares: Arc<dyn ShareStore>,
    pub linking: AccountLinkingService,
}

pub mod entities {
    pub mod prelude;
    pub mod accounts;
    pub mod applied_shares;
    pub mod applied_share_errors;
    pub mod sync_status;
}

pub mod services {
    pub mod calendar;
    pub mod meroshare;
    pub mod store;
    pub mod store_db;
    pub mod store_memory;
    pub mod eligibility;
    pub mod account_linking;
    pub mod share_apply;
    pub mod sync_status;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod models;
