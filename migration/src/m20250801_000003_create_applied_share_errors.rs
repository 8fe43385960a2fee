use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppliedShareErrors::Table)
                    .if_not_exists()
                    .col(pk_uuid(AppliedShareErrors::Id))
                    .col(uuid(AppliedShareErrors::UserId))
                    .col(uuid(AppliedShareErrors::AccountId))
                    .col(uuid(AppliedShareErrors::AppliedShareId).unique_key())
                    .col(text(AppliedShareErrors::Message))
                    .col(boolean(AppliedShareErrors::Seen).default(false))
                    .col(timestamp_with_time_zone(AppliedShareErrors::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applied_share_errors_share")
                            .from(AppliedShareErrors::Table, AppliedShareErrors::AppliedShareId)
                            .to(AppliedShares::Table, AppliedShares::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applied_share_errors_user_id")
                    .table(AppliedShareErrors::Table)
                    .col(AppliedShareErrors::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppliedShareErrors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AppliedShareErrors {
    Table,
    Id,
    UserId,
    AccountId,
    AppliedShareId,
    Message,
    Seen,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AppliedShares {
    Table,
    Id,
}
