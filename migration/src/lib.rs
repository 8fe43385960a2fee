pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_accounts;
mod m20250801_000002_create_applied_shares;
mod m20250801_000003_create_applied_share_errors;
mod m20250815_000001_create_sync_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_accounts::Migration),
            Box::new(m20250801_000002_create_applied_shares::Migration),
            Box::new(m20250801_000003_create_applied_share_errors::Migration),
            Box::new(m20250815_000001_create_sync_status::Migration),
        ]
    }
}
