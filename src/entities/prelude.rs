pub use super::accounts::Entity as Accounts;
pub use super::applied_share_errors::Entity as AppliedShareErrors;
pub use super::applied_shares::Entity as AppliedShares;
pub use super::sync_status::Entity as SyncStatus;
