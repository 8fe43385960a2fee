//! One row per (account, issue) application attempt

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppliedShares::Table)
                    .if_not_exists()
                    .col(pk_uuid(AppliedShares::Id))
                    .col(uuid(AppliedShares::UserId))
                    .col(uuid(AppliedShares::AccountId))
                    .col(big_integer(AppliedShares::CompanyShareId))
                    .col(string(AppliedShares::CompanyName))
                    .col(string(AppliedShares::Scrip))
                    .col(integer(AppliedShares::AppliedKitta))
                    .col(string(AppliedShares::ShareGroupName))
                    .col(string(AppliedShares::ShareTypeName))
                    .col(string(AppliedShares::SubGroup))
                    .col(string_len(AppliedShares::Status, 20).default("applied"))
                    .col(timestamp_with_time_zone(AppliedShares::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applied_shares_account")
                            .from(AppliedShares::Table, AppliedShares::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applied_shares_user_id")
                    .table(AppliedShares::Table)
                    .col(AppliedShares::UserId)
                    .to_owned(),
            )
            .await?;

        // An issue is never attempted twice for the same account
        manager
            .create_index(
                Index::create()
                    .name("idx_applied_shares_account_issue")
                    .table(AppliedShares::Table)
                    .col(AppliedShares::AccountId)
                    .col(AppliedShares::CompanyShareId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppliedShares::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AppliedShares {
    Table,
    Id,
    UserId,
    AccountId,
    CompanyShareId,
    CompanyName,
    Scrip,
    AppliedKitta,
    ShareGroupName,
    ShareTypeName,
    SubGroup,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
}
