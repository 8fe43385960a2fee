//! Linked depository accounts, one user owning many

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_uuid(Accounts::Id))
                    .col(uuid(Accounts::UserId))
                    .col(string(Accounts::Name))
                    .col(string(Accounts::Email))
                    .col(string(Accounts::Contact))
                    .col(integer(Accounts::ClientId))
                    .col(string_len(Accounts::Username, 50))
                    .col(string(Accounts::Password))
                    .col(string(Accounts::BankId))
                    .col(string(Accounts::CrnNumber))
                    .col(string(Accounts::TransactionPin))
                    .col(integer(Accounts::AccountTypeId))
                    .col(integer(Accounts::PreferredKitta))
                    .col(string(Accounts::Demat))
                    .col(string(Accounts::Boid))
                    .col(string(Accounts::AccountNumber))
                    .col(big_integer(Accounts::CustomerId))
                    .col(big_integer(Accounts::AccountBranchId))
                    .col(string_len(Accounts::DmatExpiryDate, 50))
                    .col(timestamp_with_time_zone(Accounts::ExpiredDate))
                    .col(timestamp_with_time_zone(Accounts::PasswordExpiryDate))
                    .col(string_len(Accounts::Status, 20).default("active"))
                    .col(timestamp_with_time_zone(Accounts::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Accounts::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Accounts::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_user_id")
                    .table(Accounts::Table)
                    .col(Accounts::UserId)
                    .to_owned(),
            )
            .await?;

        // Username is unique among live accounts only
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_username_live
                ON accounts (username)
                WHERE deleted_at IS NULL;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    Email,
    Contact,
    ClientId,
    Username,
    Password,
    BankId,
    CrnNumber,
    TransactionPin,
    AccountTypeId,
    PreferredKitta,
    Demat,
    Boid,
    AccountNumber,
    CustomerId,
    AccountBranchId,
    DmatExpiryDate,
    ExpiredDate,
    PasswordExpiryDate,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
