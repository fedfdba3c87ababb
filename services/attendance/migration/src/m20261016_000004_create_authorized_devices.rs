use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthorizedDevices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthorizedDevices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthorizedDevices::TraineeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthorizedDevices::SecretCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthorizedDevices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AuthorizedDevices::Table, AuthorizedDevices::TraineeId)
                            .to(Trainees::Table, Trainees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AuthorizedDevices::Table)
                    .col(AuthorizedDevices::TraineeId)
                    .name("idx_authorized_devices_trainee_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthorizedDevices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuthorizedDevices {
    Table,
    Id,
    TraineeId,
    SecretCode,
    CreatedAt,
}

#[derive(Iden)]
enum Trainees {
    Table,
    Id,
}
